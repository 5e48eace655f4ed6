//! End-to-end climatology tests over synthetic catalogs.

use is_close::is_close;
use ndarray::Array2;
use rainfall_core::calendar::GroupKey;
use rainfall_core::collection::RasterCollection;
use rainfall_core::geometry::{BoundaryCollection, Feature, Geometry};
use rainfall_core::raster::{GridSpec, Raster, RasterDate};
use rainfall_core::source::MemoryCatalog;
use rainfall_era5::analyses;
use rainfall_era5::config::AnalysisConfig;
use rainfall_era5::datasets;
use std::collections::HashMap;

/// A small grid covering the Rwanda bounding rectangle.
fn grid() -> GridSpec {
    GridSpec::new(28.5, -1.0, 0.5, 5, 5)
}

fn uniform_raster(year: i32, month: u32, day: u32, meters: f64) -> Raster {
    Raster::new(
        RasterDate::new(year, month, day),
        datasets::PRECIPITATION_BAND,
        Array2::from_elem((5, 5), meters),
    )
}

fn rwanda_boundaries() -> BoundaryCollection {
    let mut attributes = HashMap::new();
    attributes.insert(
        datasets::COUNTRY_ATTRIBUTE.to_string(),
        datasets::COUNTRY.to_string(),
    );
    BoundaryCollection::new(vec![Feature::new(
        attributes,
        Geometry::rectangle(datasets::RWANDA_RECT),
    )])
}

#[test]
fn monthly_january_mean_is_the_mean_of_contributing_years() {
    // January rasters worth 1, 2 and 3 cm across three years in the window,
    // plus one outside the window that must not contribute.
    let collection = RasterCollection::from_rasters(
        grid(),
        vec![
            uniform_raster(2009, 1, 1, 0.01),
            uniform_raster(2010, 1, 1, 0.02),
            uniform_raster(2011, 1, 1, 0.03),
            uniform_raster(2008, 1, 1, 0.99),
            uniform_raster(2009, 2, 1, 0.05),
        ],
    )
    .unwrap();

    let catalog = MemoryCatalog::new()
        .with_rasters(datasets::ERA5_MONTHLY, collection)
        .with_boundaries(datasets::GAUL_LEVEL0, rwanda_boundaries());

    let table = analyses::monthly_rainfall(&catalog, &AnalysisConfig::default()).unwrap();

    assert_eq!(table.len(), 2);
    assert!(is_close!(table.get(GroupKey::Month(1)).unwrap(), 2.0));
    assert!(is_close!(table.get(GroupKey::Month(2)).unwrap(), 5.0));
}

#[test]
fn daily_march_first_shares_a_slot_across_leap_and_common_years() {
    // 2011 (common) March 1 and 2012 (leap) March 1 must land in slot 59;
    // the 2012 leap day must vanish entirely.
    let collection = RasterCollection::from_rasters(
        grid(),
        vec![
            uniform_raster(2011, 3, 1, 0.01),
            uniform_raster(2012, 2, 29, 0.50),
            uniform_raster(2012, 3, 1, 0.03),
        ],
    )
    .unwrap();

    let catalog = MemoryCatalog::new()
        .with_rasters(datasets::ERA5_DAILY, collection)
        .with_boundaries(datasets::GAUL_LEVEL0, rwanda_boundaries());

    let table = analyses::daily_rainfall(&catalog, &AnalysisConfig::default()).unwrap();

    // One slot only: the leap day contributed nothing.
    assert_eq!(table.len(), 1);
    // Mean of 1 cm and 3 cm; the 50 cm leap-day raster would skew this badly
    // if it leaked through.
    assert!(is_close!(table.get(GroupKey::DayOfYear(59)).unwrap(), 2.0));
}

#[test]
fn rect_analysis_needs_no_boundary_dataset() {
    let collection = RasterCollection::from_rasters(
        grid(),
        vec![
            uniform_raster(2009, 7, 1, 0.004),
            uniform_raster(2010, 7, 1, 0.006),
        ],
    )
    .unwrap();

    // No boundaries registered at all: the literal rectangle must suffice.
    let catalog = MemoryCatalog::new().with_rasters(datasets::ERA5_MONTHLY, collection);

    let table = analyses::rect_rainfall(&catalog, &AnalysisConfig::default()).unwrap();

    assert_eq!(table.len(), 1);
    assert!(is_close!(table.get(GroupKey::Month(7)).unwrap(), 0.5));
}

#[test]
fn rect_analysis_ignores_the_year_window() {
    // Rasters far outside 2009-2019 still contribute to the rect analysis.
    let collection = RasterCollection::from_rasters(
        grid(),
        vec![
            uniform_raster(1990, 7, 1, 0.01),
            uniform_raster(2020, 7, 1, 0.03),
        ],
    )
    .unwrap();

    let catalog = MemoryCatalog::new().with_rasters(datasets::ERA5_MONTHLY, collection);
    let table = analyses::rect_rainfall(&catalog, &AnalysisConfig::default()).unwrap();

    assert!(is_close!(table.get(GroupKey::Month(7)).unwrap(), 2.0));
}

#[test]
fn missing_dataset_is_reported() {
    let catalog = MemoryCatalog::new();
    let result = analyses::monthly_rainfall(&catalog, &AnalysisConfig::default());
    assert!(result.is_err());
}
