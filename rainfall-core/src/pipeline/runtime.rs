//! Pipeline runtime.

use super::{PipelineState, Stage};
use crate::errors::{RainfallError, RainfallResult};
use crate::table::SampleTable;
use petgraph::algo::toposort;
use petgraph::dot::{Config, Dot};
use petgraph::Graph;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An assembled pipeline: a stage dependency graph plus the initial state.
///
/// Created by [`super::PipelineBuilder`]. Execution walks the stages in
/// topological order, threading the state through each.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pipeline {
    stages: Graph<Arc<dyn Stage>, ()>,
    state: PipelineState,
}

impl Pipeline {
    pub(crate) fn new(stages: Graph<Arc<dyn Stage>, ()>, state: PipelineState) -> Self {
        Self { stages, state }
    }

    /// Number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.node_count() == 0
    }

    /// Graphviz rendering of the stage graph, for debugging.
    pub fn as_dot(&self) -> String {
        let named = self.stages.map(|_, stage| stage.name(), |_, _| ());
        format!("{:?}", Dot::with_config(&named, &[Config::EdgeNoLabel]))
    }

    /// Execute every stage in dependency order and collect the aggregated
    /// samples into a table.
    pub fn run(self) -> RainfallResult<SampleTable> {
        let order = toposort(&self.stages, None)
            .map_err(|_| RainfallError::Error("pipeline graph contains a cycle".to_string()))?;

        let mut state = self.state;
        for node in order {
            let stage = &self.stages[node];
            log::info!("running stage '{}'", stage.name());
            state = stage.apply(state)?;
        }
        Ok(SampleTable::from_samples(state.samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{GroupKey, KeyScheme};
    use crate::collection::RasterCollection;
    use crate::geometry::Geometry;
    use crate::pipeline::stages::{AssignKey, ConvertUnits, FilterYears, MeanByKey, ReduceRegionMean};
    use crate::pipeline::PipelineBuilder;
    use crate::raster::{GridSpec, Raster, RasterDate};
    use is_close::is_close;
    use ndarray::Array2;

    fn collection() -> RasterCollection {
        let grid = GridSpec::new(29.0, -1.0, 0.5, 2, 2);
        let rasters = (2009..=2011)
            .map(|year| {
                Raster::new(
                    RasterDate::new(year, 1, 1),
                    "total_precipitation",
                    Array2::from_elem((2, 2), (year - 2008) as f64 / 100.0),
                )
            })
            .collect();
        RasterCollection::from_rasters(grid, rasters).unwrap()
    }

    fn build_pipeline() -> Pipeline {
        PipelineBuilder::new()
            .with_collection(collection())
            .with_aoi(Geometry::rectangle([29.0, -2.0, 31.0, -1.0]))
            .then(Arc::new(FilterYears::new(2009, 2019)))
            .then(Arc::new(AssignKey::new(KeyScheme::Month)))
            .then(Arc::new(MeanByKey))
            .then(Arc::new(ConvertUnits::new(
                "total_precipitation",
                "total_precipitation_cm",
                100.0,
            )))
            .then(Arc::new(ReduceRegionMean::new(
                "total_precipitation_cm",
                10_000.0,
            )))
            .build()
            .unwrap()
    }

    #[test]
    fn run_produces_per_key_means() {
        let table = build_pipeline().run().unwrap();
        assert_eq!(table.len(), 1);
        // Mean of 1, 2, 3 cm for January across 2009-2011.
        assert!(is_close!(table.get(GroupKey::Month(1)).unwrap(), 2.0));
    }

    #[test]
    fn empty_builder_is_an_error() {
        let result = PipelineBuilder::new().with_collection(collection()).build();
        assert!(matches!(result, Err(RainfallError::EmptyPipeline)));
    }

    #[test]
    fn missing_collection_is_an_error() {
        let result = PipelineBuilder::new()
            .then(Arc::new(MeanByKey))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn dot_lists_stages_in_chain() {
        let dot = build_pipeline().as_dot();
        assert!(dot.contains("filter_years"));
        assert!(dot.contains("reduce_region_mean"));
    }

    #[test]
    fn serialise_and_deserialise_pipeline() {
        let pipeline = build_pipeline();
        let serialised = serde_json::to_string(&pipeline).unwrap();
        let deserialised: Pipeline = serde_json::from_str(&serialised).unwrap();
        assert_eq!(deserialised.len(), 5);

        let table = deserialised.run().unwrap();
        assert!(is_close!(table.get(GroupKey::Month(1)).unwrap(), 2.0));
    }
}
