use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum RainfallError {
    #[error("{0}")]
    Error(String),
    #[error("dataset '{0}' not found in catalog")]
    DatasetNotFound(String),
    #[error("band '{0}' not found")]
    BandNotFound(String),
    #[error("band '{0}' already exists")]
    DuplicateBand(String),
    #[error("raster shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("attribute '{attribute}' = '{value}' matched no features")]
    NoMatchingFeature { attribute: String, value: String },
    #[error("no samples intersect the area of interest")]
    EmptyRegion,
    #[error("stage '{stage}' requires {requirement}")]
    MissingRequirement {
        stage: &'static str,
        requirement: &'static str,
    },
    #[error("pipeline has no stages")]
    EmptyPipeline,
    #[error("chart rendering failed: {0}")]
    Chart(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Convenience type for `Result<T, RainfallError>`.
pub type RainfallResult<T> = Result<T, RainfallError>;
