pub mod calendar;
pub mod chart;
pub mod collection;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod raster;
pub mod source;
pub mod table;

pub mod errors;
