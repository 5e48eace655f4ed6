//! Analysis configuration.

use crate::datasets;
use rainfall_core::errors::{RainfallError, RainfallResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration shared by the three analyses, loadable from TOML.
///
/// Every field has a default, so an empty document is a valid
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory the file catalog resolves datasets from.
    pub catalog_dir: PathBuf,
    /// Closed year window, inclusive of both endpoints.
    pub start_year: i32,
    pub end_year: i32,
    /// Ground sampling distance for spatial reduction, meters.
    pub scale_m: f64,
    /// Export destination folder and file name prefix.
    pub export_folder: PathBuf,
    pub export_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from("catalog"),
            start_year: datasets::DEFAULT_START_YEAR,
            end_year: datasets::DEFAULT_END_YEAR,
            scale_m: datasets::DEFAULT_SCALE_M,
            export_folder: PathBuf::from(datasets::EXPORT_FOLDER),
            export_prefix: datasets::EXPORT_PREFIX.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn from_path(path: &Path) -> RainfallResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| RainfallError::Error(format!("invalid config {:?}: {}", path, e)))
    }
}
