//! Ordered collections of rasters sharing a grid.

use crate::calendar::GroupKey;
use crate::errors::{RainfallError, RainfallResult};
use crate::raster::{GridSpec, Raster};
use serde::{Deserialize, Serialize};

/// An ordered multiset of rasters on a common [`GridSpec`].
///
/// Supports the declarative operations the pipeline is built from: filtering
/// by metadata predicate, per-raster transformation and a save-all style
/// self-join on the group key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterCollection {
    grid: GridSpec,
    rasters: Vec<Raster>,
}

impl RasterCollection {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            rasters: Vec::new(),
        }
    }

    pub fn from_rasters(grid: GridSpec, rasters: Vec<Raster>) -> RainfallResult<Self> {
        let mut collection = Self::new(grid);
        for raster in rasters {
            collection.push(raster)?;
        }
        Ok(collection)
    }

    /// Append a raster, checking it matches the collection grid.
    pub fn push(&mut self, raster: Raster) -> RainfallResult<()> {
        if raster.shape() != self.grid.shape() {
            return Err(RainfallError::ShapeMismatch {
                expected: self.grid.shape(),
                actual: raster.shape(),
            });
        }
        self.rasters.push(raster);
        Ok(())
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Raster> {
        self.rasters.iter()
    }

    /// New collection keeping only rasters matching the predicate.
    pub fn filter(&self, predicate: impl Fn(&Raster) -> bool) -> Self {
        Self {
            grid: self.grid.clone(),
            rasters: self
                .rasters
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// New collection with each raster transformed.
    pub fn map(&self, f: impl Fn(&Raster) -> RainfallResult<Raster>) -> RainfallResult<Self> {
        let mut collection = Self::new(self.grid.clone());
        for raster in &self.rasters {
            collection.push(f(raster)?)?;
        }
        Ok(collection)
    }

    /// Distinct group keys in first-appearance order.
    ///
    /// Rasters without an assigned key are an error; key assignment is a
    /// prerequisite for grouping.
    pub fn distinct_keys(&self) -> RainfallResult<Vec<GroupKey>> {
        let mut keys = Vec::new();
        for raster in &self.rasters {
            let key = raster.key().ok_or(RainfallError::MissingRequirement {
                stage: "group_by_key",
                requirement: "assigned group keys",
            })?;
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    /// Save-all self-join on the group key: for each distinct key, the full
    /// list of same-key rasters in collection order.
    pub fn group_by_key(&self) -> RainfallResult<Vec<(GroupKey, Vec<&Raster>)>> {
        let keys = self.distinct_keys()?;
        Ok(keys
            .into_iter()
            .map(|key| {
                let members = self
                    .rasters
                    .iter()
                    .filter(|r| r.key() == Some(key))
                    .collect();
                (key, members)
            })
            .collect())
    }
}

impl IntoIterator for RasterCollection {
    type Item = Raster;
    type IntoIter = std::vec::IntoIter<Raster>;

    fn into_iter(self) -> Self::IntoIter {
        self.rasters.into_iter()
    }
}
