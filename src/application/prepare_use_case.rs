// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Fetch + clean without training. Useful to inspect what a config
// would feed the trainer.
//
// Unlike training, a missing config file is tolerated here: the
// default Configuration is used instead (it still has no dataset
// URL, so loading then fails with MissingDatasetUrl).

use std::path::Path;

use serde::Serialize;

use crate::data::{dataset::Dataset, loader::DatasetSource, preprocessor::Preprocessor};
use crate::domain::error::PipelineError;
use crate::infra::config::{ConfigSource, Configuration};

/// Cleaned data plus the summary the CLI prints
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub data:    Dataset,
    pub summary: PreparedSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedSummary {
    pub dataset:     String,
    pub raw_records: usize,
    pub records:     usize,
    pub columns:     Vec<String>,
}

pub struct PrepareUseCase {
    source: Box<dyn DatasetSource>,
}

impl PrepareUseCase {
    pub fn new(source: Box<dyn DatasetSource>) -> Self {
        Self { source }
    }

    pub fn run(&self, config_path: impl AsRef<Path>) -> Result<PreparedData, PipelineError> {
        let config = ConfigSource::load(config_path, Some(Configuration::default()))?;

        let raw  = self.source.load(&config)?;
        let data = Preprocessor::new().clean(&raw);

        let summary = PreparedSummary {
            dataset:     config.dataset.name.clone(),
            raw_records: raw.len(),
            records:     data.len(),
            columns:     data.column_names(),
        };
        Ok(PreparedData { data, summary })
    }
}
