//! Tabular results of a pipeline run.

use crate::calendar::GroupKey;
use crate::raster::FloatValue;
use serde::{Deserialize, Serialize};

/// One aggregated record: the spatial-mean value for a group key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub key: GroupKey,
    pub value: FloatValue,
}

/// Ordered table of per-key samples.
///
/// Row order is the key iteration order of the aggregated collection, which
/// exports rely on (the key is implicit in row order in the CSV output).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    samples: Vec<Sample>,
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.samples.iter().map(|s| s.key)
    }

    pub fn values(&self) -> impl Iterator<Item = FloatValue> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Value for a key, if present.
    pub fn get(&self, key: GroupKey) -> Option<FloatValue> {
        self.samples.iter().find(|s| s.key == key).map(|s| s.value)
    }
}

impl IntoIterator for SampleTable {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}
