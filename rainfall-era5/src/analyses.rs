//! The three rainfall climatology analyses.

use crate::config::AnalysisConfig;
use crate::datasets;
use rainfall_core::calendar::KeyScheme;
use rainfall_core::chart::ChartConfig;
use rainfall_core::errors::RainfallResult;
use rainfall_core::geometry::Geometry;
use rainfall_core::pipeline::stages::{
    AssignKey, ConvertUnits, DropLeapDays, FilterYears, MeanByKey, ReduceRegionMean,
};
use rainfall_core::pipeline::PipelineBuilder;
use rainfall_core::source::Catalog;
use rainfall_core::table::SampleTable;
use std::sync::Arc;

/// Resolve the country AOI from the boundary dataset by exact attribute match.
fn country_aoi(catalog: &dyn Catalog) -> RainfallResult<Geometry> {
    let boundaries = catalog.load_boundaries(datasets::GAUL_LEVEL0)?;
    boundaries.aoi(datasets::COUNTRY_ATTRIBUTE, datasets::COUNTRY)
}

fn meters_to_centimeters() -> ConvertUnits {
    ConvertUnits::new(
        datasets::PRECIPITATION_BAND,
        datasets::PRECIPITATION_CM_BAND,
        datasets::METERS_TO_CENTIMETERS,
    )
}

/// Mean rainfall per calendar month over the country boundary.
pub fn monthly_rainfall(
    catalog: &dyn Catalog,
    config: &AnalysisConfig,
) -> RainfallResult<SampleTable> {
    let rasters = catalog.load_rasters(datasets::ERA5_MONTHLY)?;
    let aoi = country_aoi(catalog)?;

    PipelineBuilder::new()
        .with_collection(rasters)
        .with_aoi(aoi)
        .then(Arc::new(FilterYears::new(config.start_year, config.end_year)))
        .then(Arc::new(AssignKey::new(KeyScheme::Month)))
        .then(Arc::new(MeanByKey))
        .then(Arc::new(meters_to_centimeters()))
        .then(Arc::new(ReduceRegionMean::new(
            datasets::PRECIPITATION_CM_BAND,
            config.scale_m,
        )))
        .build()?
        .run()
}

/// Mean rainfall per leap-adjusted day-of-year slot over the country
/// boundary. Leap days are dropped so every year contributes 365 slots.
pub fn daily_rainfall(
    catalog: &dyn Catalog,
    config: &AnalysisConfig,
) -> RainfallResult<SampleTable> {
    let rasters = catalog.load_rasters(datasets::ERA5_DAILY)?;
    let aoi = country_aoi(catalog)?;

    PipelineBuilder::new()
        .with_collection(rasters)
        .with_aoi(aoi)
        .then(Arc::new(FilterYears::new(config.start_year, config.end_year)))
        .then(Arc::new(DropLeapDays))
        .then(Arc::new(AssignKey::new(KeyScheme::DayOfYear)))
        .then(Arc::new(MeanByKey))
        .then(Arc::new(meters_to_centimeters()))
        .then(Arc::new(ReduceRegionMean::new(
            datasets::PRECIPITATION_CM_BAND,
            config.scale_m,
        )))
        .build()?
        .run()
}

/// Mean rainfall per calendar month over the literal rectangle.
///
/// No boundary dataset is consulted and no year filter is applied, so the
/// whole collection contributes.
pub fn rect_rainfall(
    catalog: &dyn Catalog,
    config: &AnalysisConfig,
) -> RainfallResult<SampleTable> {
    let rasters = catalog.load_rasters(datasets::ERA5_MONTHLY)?;

    PipelineBuilder::new()
        .with_collection(rasters)
        .with_aoi(Geometry::rectangle(datasets::RWANDA_RECT))
        .then(Arc::new(AssignKey::new(KeyScheme::Month)))
        .then(Arc::new(MeanByKey))
        .then(Arc::new(meters_to_centimeters()))
        .then(Arc::new(ReduceRegionMean::new(
            datasets::PRECIPITATION_CM_BAND,
            config.scale_m,
        )))
        .build()?
        .run()
}

/// Chart options for the monthly analyses.
pub fn monthly_chart_config() -> ChartConfig {
    ChartConfig::new("Mean monthly rainfall (cm)", "Month", "Rainfall (cm)")
        .with_x_ticks((1..=12).collect())
}

/// Chart options for the day-of-year analysis.
pub fn daily_chart_config() -> ChartConfig {
    ChartConfig::new("Mean daily rainfall (cm)", "Day of Year", "Rainfall (cm)")
}
