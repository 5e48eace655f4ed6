//! An explicit pipeline of pure transformation stages.
//!
//! A pipeline is an explicit object: a source collection and an area of
//! interest flow through an ordered chain of
//! [`Stage`]s, each a pure transformation over [`PipelineState`] that can be
//! tested independently with synthetic data.
//!
//! Stages are registered with a [`PipelineBuilder`] and executed by the
//! [`Pipeline`] runtime in dependency order.

mod builder;
mod runtime;
pub mod stages;

use crate::collection::RasterCollection;
use crate::errors::RainfallResult;
use crate::geometry::Geometry;
use crate::table::Sample;
use serde::{Deserialize, Serialize};

pub use builder::PipelineBuilder;
pub use runtime::Pipeline;

/// The value passed between stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// The working raster collection.
    pub rasters: RasterCollection,
    /// Area of interest for spatial reduction, if one has been supplied.
    pub aoi: Option<Geometry>,
    /// Aggregated per-key samples produced by reduction stages.
    pub samples: Vec<Sample>,
}

impl PipelineState {
    pub fn new(rasters: RasterCollection) -> Self {
        Self {
            rasters,
            aoi: None,
            samples: Vec::new(),
        }
    }

    pub fn with_aoi(mut self, aoi: Geometry) -> Self {
        self.aoi = Some(aoi);
        self
    }
}

/// A pure transformation stage.
///
/// Stages must not rely on external state; everything they need arrives in
/// the [`PipelineState`] or their own parameters.
#[typetag::serde(tag = "stage")]
pub trait Stage: std::fmt::Debug + Send + Sync {
    /// Stage name used for logging and graph rendering.
    fn name(&self) -> &'static str;

    /// Transform the state, returning the new state.
    fn apply(&self, state: PipelineState) -> RainfallResult<PipelineState>;
}
