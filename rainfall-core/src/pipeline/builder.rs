//! Pipeline builder.

use super::runtime::Pipeline;
use super::{PipelineState, Stage};
use crate::collection::RasterCollection;
use crate::errors::{RainfallError, RainfallResult};
use crate::geometry::Geometry;
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::sync::Arc;

/// Build a new pipeline from a source collection, an optional area of
/// interest and an ordered chain of stages.
///
/// The builder assembles the stage dependency graph used by the runtime to
/// determine execution order.
pub struct PipelineBuilder {
    collection: Option<RasterCollection>,
    aoi: Option<Geometry>,
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            collection: None,
            aoi: None,
            stages: vec![],
        }
    }

    /// Supply the source raster collection the pipeline operates on.
    pub fn with_collection(&mut self, collection: RasterCollection) -> &mut Self {
        self.collection = Some(collection);
        self
    }

    /// Supply the area of interest for spatial reduction stages.
    pub fn with_aoi(&mut self, aoi: Geometry) -> &mut Self {
        self.aoi = Some(aoi);
        self
    }

    /// Append a stage to the chain.
    pub fn then(&mut self, stage: Arc<dyn Stage>) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Assemble the pipeline.
    ///
    /// Returns an error if no stages were registered or no source collection
    /// was supplied.
    pub fn build(&self) -> RainfallResult<Pipeline> {
        if self.stages.is_empty() {
            return Err(RainfallError::EmptyPipeline);
        }
        let collection = self
            .collection
            .clone()
            .ok_or_else(|| RainfallError::Error("pipeline requires a source collection".to_string()))?;

        let mut graph: Graph<Arc<dyn Stage>, ()> = Graph::new();
        let mut previous: Option<NodeIndex> = None;
        for stage in &self.stages {
            let node = graph.add_node(stage.clone());
            if let Some(prev) = previous {
                graph.add_edge(prev, node, ());
            }
            previous = Some(node);
        }

        let mut state = PipelineState::new(collection);
        if let Some(aoi) = &self.aoi {
            state = state.with_aoi(aoi.clone());
        }

        Ok(Pipeline::new(graph, state))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
