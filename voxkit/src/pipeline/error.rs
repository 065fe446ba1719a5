//! Error types for the pipeline layer

use thiserror::Error;

/// Errors that can occur while configuring or running a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxkit_core::Error),

    #[error("morphology error: {0}")]
    Morph(#[from] voxkit_morph::MorphError),

    #[error("filter error: {0}")]
    Filter(#[from] voxkit_filter::FilterError),

    #[error("region error: {0}")]
    Region(#[from] voxkit_region::RegionError),

    #[error("threshold error: {0}")]
    Threshold(#[from] voxkit_threshold::ThresholdError),

    /// Configuration could not be parsed
    #[error("invalid pipeline json: {0}")]
    Json(#[from] serde_json::Error),

    /// A step could not be parsed
    #[error("step {index}: {source}")]
    InvalidStep {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid step configuration, caught before any step runs
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    /// No context entry with this name
    #[error("no entry named '{0}'")]
    MissingEntry(String),

    /// Context entry holds a different kind of value
    #[error("entry '{name}' is a {actual}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
