//! The transformation stages shipped with the pipeline.

use super::{PipelineState, Stage};
use crate::calendar::{adjusted_day_of_year, GroupKey, KeyScheme};
use crate::errors::{RainfallError, RainfallResult};
use crate::geometry::reduce_region_mean;
use crate::raster::{FloatValue, Raster};
use crate::table::Sample;
use serde::{Deserialize, Serialize};

/// Keep rasters whose year lies in a closed window (inclusive both ends).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterYears {
    pub start: i32,
    pub end: i32,
}

impl FilterYears {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

#[typetag::serde]
impl Stage for FilterYears {
    fn name(&self) -> &'static str {
        "filter_years"
    }

    fn apply(&self, mut state: PipelineState) -> RainfallResult<PipelineState> {
        state.rasters = state
            .rasters
            .filter(|r| r.date().year >= self.start && r.date().year <= self.end);
        Ok(state)
    }
}

/// Drop any raster dated February 29, keeping the calendar at 365 slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropLeapDays;

#[typetag::serde]
impl Stage for DropLeapDays {
    fn name(&self) -> &'static str {
        "drop_leap_days"
    }

    fn apply(&self, mut state: PipelineState) -> RainfallResult<PipelineState> {
        state.rasters = state.rasters.filter(|r| !r.date().is_leap_day());
        Ok(state)
    }
}

/// Stamp each raster with its group key under the configured scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignKey {
    pub scheme: KeyScheme,
}

impl AssignKey {
    pub fn new(scheme: KeyScheme) -> Self {
        Self { scheme }
    }
}

#[typetag::serde]
impl Stage for AssignKey {
    fn name(&self) -> &'static str {
        "assign_key"
    }

    fn apply(&self, mut state: PipelineState) -> RainfallResult<PipelineState> {
        let scheme = self.scheme;
        state.rasters = state.rasters.map(|raster| {
            let date = raster.date();
            let key = match scheme {
                KeyScheme::Month => GroupKey::Month(date.month),
                KeyScheme::DayOfYear => {
                    GroupKey::DayOfYear(adjusted_day_of_year(date.year, date.month, date.day)?)
                }
            };
            Ok(raster.clone().with_key(key))
        })?;
        Ok(state)
    }
}

/// Average all same-key rasters into one composite per distinct key.
///
/// The key survives only as metadata on the composite; keys are unique in the
/// output collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanByKey;

#[typetag::serde]
impl Stage for MeanByKey {
    fn name(&self) -> &'static str {
        "mean_by_key"
    }

    fn apply(&self, mut state: PipelineState) -> RainfallResult<PipelineState> {
        let mut composites = Vec::new();
        for (key, members) in state.rasters.group_by_key()? {
            let composite = Raster::mean_of(&members)?.with_key(key);
            composites.push(composite);
        }
        state.rasters =
            crate::collection::RasterCollection::from_rasters(state.rasters.grid().clone(), composites)?;
        Ok(state)
    }
}

/// Rescale a band by a constant factor, appending the result as a new band.
///
/// The source band is preserved; downstream stages read the new band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertUnits {
    pub from_band: String,
    pub to_band: String,
    pub factor: FloatValue,
}

impl ConvertUnits {
    pub fn new(from_band: impl Into<String>, to_band: impl Into<String>, factor: FloatValue) -> Self {
        Self {
            from_band: from_band.into(),
            to_band: to_band.into(),
            factor,
        }
    }
}

#[typetag::serde]
impl Stage for ConvertUnits {
    fn name(&self) -> &'static str {
        "convert_units"
    }

    fn apply(&self, mut state: PipelineState) -> RainfallResult<PipelineState> {
        state.rasters = state
            .rasters
            .map(|raster| raster.scaled_band(&self.from_band, &self.to_band, self.factor))?;
        Ok(state)
    }
}

/// Spatially reduce each per-key composite to its mean over the AOI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceRegionMean {
    pub band: String,
    pub scale_m: f64,
}

impl ReduceRegionMean {
    pub fn new(band: impl Into<String>, scale_m: f64) -> Self {
        Self {
            band: band.into(),
            scale_m,
        }
    }
}

#[typetag::serde]
impl Stage for ReduceRegionMean {
    fn name(&self) -> &'static str {
        "reduce_region_mean"
    }

    fn apply(&self, mut state: PipelineState) -> RainfallResult<PipelineState> {
        let aoi = state
            .aoi
            .as_ref()
            .ok_or(RainfallError::MissingRequirement {
                stage: "reduce_region_mean",
                requirement: "an area of interest",
            })?;
        let grid = state.rasters.grid().clone();
        let mut samples = Vec::with_capacity(state.rasters.len());
        for raster in state.rasters.iter() {
            let key = raster.key().ok_or(RainfallError::MissingRequirement {
                stage: "reduce_region_mean",
                requirement: "assigned group keys",
            })?;
            let value = reduce_region_mean(raster, &grid, &self.band, aoi, self.scale_m)?;
            samples.push(Sample { key, value });
        }
        state.samples = samples;
        Ok(state)
    }
}
