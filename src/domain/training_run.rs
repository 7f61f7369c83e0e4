// ============================================================
// Layer 3 — TrainingRun / TrainRequest Domain Types
// ============================================================
// TrainRequest is everything the external training framework is
// handed. TrainingRun is what one orchestration invocation leaves
// behind: how much data went in, which columns it had, which
// hyperparameters were used and where the artifact ended up.
//
// A TrainingRun is built once at the end of a successful run and
// never modified. Persisting the model itself is the framework's job.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Hyperparameters forwarded to the external trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub epochs:     usize,
    pub batch_size: usize,
}

/// Input of one external training invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRequest {
    /// Training wrapper, split on whitespace into program + leading args
    pub command:      String,
    /// Domain definition file (intents, responses, slots)
    pub domain_file:  PathBuf,
    /// Pipeline/policy configuration file of the framework
    pub config_file:  PathBuf,
    /// Directory the cleaned dataset was materialized into
    pub training_dir: PathBuf,
    /// Directory the framework writes its artifact to
    pub output_dir:   PathBuf,
    pub hyperparameters: Hyperparameters,
}

/// Record of one completed orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRun {
    /// Name of the dataset that was fetched
    pub dataset: String,

    /// Number of cleaned records handed to training
    /// (after the optional hold-out split)
    pub records: usize,

    /// Column set of the cleaned dataset
    pub columns: Vec<String>,

    pub hyperparameters: Hyperparameters,

    /// Where the cleaned training records were written
    pub training_data: PathBuf,

    /// Where the held-out records were written, if a split was requested
    pub held_out: Option<PathBuf>,

    /// Artifact path reported by the external trainer
    pub artifact: PathBuf,
}
