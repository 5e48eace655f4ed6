//! ERA5 rainfall climatology analyses for Rwanda.
//!
//! Three analyses, each a pipeline over an ERA5 precipitation dataset:
//!
//! - `monthly_rainfall`: mean rainfall per calendar month over the Rwanda
//!   country boundary, 2009-2019.
//! - `daily_rainfall`: mean rainfall per leap-adjusted day-of-year slot over
//!   the country boundary, 2009-2019.
//! - `rect_rainfall`: mean monthly rainfall over a literal bounding
//!   rectangle, with no boundary-dataset lookup and no year filter.
//!
//! Each yields a table of per-key means in centimeters that can be charted
//! and exported as a single-column CSV.

pub mod analyses;
pub mod config;
pub mod datasets;
