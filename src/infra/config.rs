// ============================================================
// Layer 6 — Configuration (ConfigSource)
// ============================================================
// Loads the YAML configuration document once and turns it into a
// single typed struct. Every default lives here, in the Default
// impls below; call sites never supply their own fallback values.
//
// Example config.yaml:
//
//   project:
//     name: support-bot
//     version: 1.2.0
//   dataset:
//     name: toxic_conversations
//     url: https://example.com/conversations.json
//     domain: support
//   training:
//     epochs: 50
//     batch_size: 16
//   deployment:
//     port: 8080
//     debug: true
//
// `dataset.url` and `training.command` have no default. Their absence
// only matters when a dataset is loaded or a model is trained.
//
// Trainer contract: `training.command` names a wrapper (script or
// binary, optionally with leading arguments) that is invoked as
//
//   <command> train --domain <domain_file> --config <config_file>
//                   --data <training_dir> --out <output_dir>
//                   --epochs <n> --batch-size <n>
//
// `<training_dir>` holds `<dataset.name>.json`, a JSON array of the
// cleaned records. The wrapper converts it into whatever the framework
// reads, runs the training and leaves the artifact in `<output_dir>`.
//
// `training.test_dir` must not be inside `training.training_dir`, or
// held-out rows would be handed to the trainer as well.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;
use crate::domain::training_run::Hyperparameters;

/// The whole configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub project:    ProjectConfig,
    pub dataset:    DatasetConfig,
    pub training:   TrainingConfig,
    pub deployment: DeploymentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name:    String,
    pub version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name:    "chatbot".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub name:   String,
    /// Remote JSON endpoint; required only when loading
    pub url:    Option<String>,
    /// Conversational domain reported by the serving API
    pub domain: String,
    /// Per-request timeout of the dataset fetch
    pub timeout_secs: u64,
    /// Extra fetch attempts after the first one fails
    pub max_retries:  usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name:         "toxic_conversations".to_string(),
            url:          None,
            domain:       "general".to_string(),
            timeout_secs: 30,
            max_retries:  0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs:      usize,
    pub batch_size:  usize,
    pub domain_file: PathBuf,
    pub config_file: PathBuf,
    pub training_dir: PathBuf,
    pub output_dir:  PathBuf,
    pub test_dir:    PathBuf,
    /// Fraction of cleaned rows kept back for evaluation (0.0 = none)
    pub holdout_fraction: f64,
    pub seed:        u64,
    /// Training wrapper invoked per the contract above; unset by default
    pub command:     String,
    /// Column holding the expected intent in evaluation data
    pub label_column: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs:           100,
            batch_size:       32,
            domain_file:      PathBuf::from("rasa/domain.yml"),
            config_file:      PathBuf::from("rasa/config.yml"),
            training_dir:     PathBuf::from("data/"),
            output_dir:       PathBuf::from("models/"),
            test_dir:         PathBuf::from("test_data/"),
            holdout_fraction: 0.0,
            seed:             42,
            command:          String::new(),
            label_column:     "intent".to_string(),
        }
    }
}

impl TrainingConfig {
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            epochs:     self.epochs,
            batch_size: self.batch_size,
        }
    }

    /// Reject a layout where held-out files would land in the
    /// directory handed to the trainer.
    pub fn check_directories(&self) -> Result<(), PipelineError> {
        if self.test_dir.starts_with(&self.training_dir) {
            return Err(PipelineError::InvalidConfig(format!(
                "training.test_dir '{}' is inside training.training_dir '{}'",
                self.test_dir.display(),
                self.training_dir.display()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub host:  String,
    pub port:  u16,
    pub debug: bool,
    /// Artifact the serving API loads on first use
    pub model_path: PathBuf,
    /// Base URL of the framework's NLU HTTP server
    pub nlu_url:    String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            host:       "0.0.0.0".to_string(),
            port:       5005,
            debug:      false,
            model_path: PathBuf::from(
                "models/default/nlu-INTENT_FEATURIZER_INTENT_CLASSIFIER-ner_crf/",
            ),
            nlu_url:    "http://localhost:5006".to_string(),
        }
    }
}

// ─── ConfigSource ─────────────────────────────────────────────────────────────
/// Reads a Configuration from a YAML file.
pub struct ConfigSource;

impl ConfigSource {
    /// Load the configuration at `path`.
    ///
    /// * missing file, no fallback   → `ConfigNotFound`
    /// * missing file, with fallback → the fallback (logged as a warning)
    /// * malformed document          → `ConfigParse`
    /// * empty document              → all defaults
    pub fn load(
        path:     impl AsRef<Path>,
        fallback: Option<Configuration>,
    ) -> Result<Configuration, PipelineError> {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return match fallback {
                    Some(config) => {
                        tracing::warn!(
                            "Config file not found at '{}', using defaults",
                            path.display()
                        );
                        Ok(config)
                    }
                    None => Err(PipelineError::ConfigNotFound(path.to_path_buf())),
                };
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::parse(&text).map_err(|reason| PipelineError::ConfigParse {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::debug!("Loaded config '{}' ({})", path.display(), config.project.name);
        Ok(config)
    }

    /// Parse a YAML document. A blank document yields the defaults.
    pub fn parse(text: &str) -> Result<Configuration, String> {
        if text.trim().is_empty() {
            return Ok(Configuration::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }
}
