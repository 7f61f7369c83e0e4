// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Every stage of the pipeline returns `PipelineError`. Stages never
// catch-and-continue: an error aborts the run and reaches the caller
// exactly as the failing stage produced it.
//
// Request-level failures of the serving API have their own type
// (`server::ServeError`) and are not part of this taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort config loading, ingestion, training or
/// evaluation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The config file does not exist and no fallback was supplied
    #[error("config file not found: '{}'", .0.display())]
    ConfigNotFound(PathBuf),

    /// The config file exists but is not a valid configuration document
    #[error("cannot parse config '{}': {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// Settings that parse but cannot be used together
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `dataset.url` is absent; carries the dataset name
    #[error("no URL configured for dataset: {0}")]
    MissingDatasetUrl(String),

    /// Transport failure (`status` is None) or non-success response
    #[error("cannot fetch dataset from '{url}': {reason}")]
    DatasetFetch {
        url:    String,
        status: Option<u16>,
        reason: String,
    },

    /// The body is not a JSON array of objects
    #[error("dataset is not a sequence of records: {0}")]
    DatasetParse(String),

    /// The external training invocation failed or produced no artifact
    #[error("training failed: {0}")]
    Training(String),

    #[error("evaluation failed: {0}")]
    Evaluation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// HTTP status of a failed fetch, when the server answered at all
    pub fn fetch_status(&self) -> Option<u16> {
        match self {
            PipelineError::DatasetFetch { status, .. } => *status,
            _ => None,
        }
    }
}
