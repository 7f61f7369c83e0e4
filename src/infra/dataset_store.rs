// ============================================================
// Layer 6 — Dataset Store
// ============================================================
// Materializes cleaned datasets as JSON files the training
// framework can read, and reads held-out files back for evaluation.
//
// File layout (defaults):
//   data/
//     toxic_conversations.json   ← cleaned training records
//     test/
//       toxic_conversations.json ← held-out records (optional)
//
// Each file is a pretty-printed JSON array of records, the same
// shape the dataset endpoint serves.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::dataset::Dataset;
use crate::domain::error::PipelineError;

pub struct DatasetStore {
    /// Directory the training records go to
    training_dir: PathBuf,
    /// Directory the held-out records go to
    test_dir:     PathBuf,
}

impl DatasetStore {
    pub fn new(training_dir: impl Into<PathBuf>, test_dir: impl Into<PathBuf>) -> Self {
        Self {
            training_dir: training_dir.into(),
            test_dir:     test_dir.into(),
        }
    }

    pub fn training_dir(&self) -> &Path {
        &self.training_dir
    }

    /// Write the training records as `<training_dir>/<name>.json`
    pub fn save_training(&self, name: &str, ds: &Dataset) -> Result<PathBuf, PipelineError> {
        Self::write(&self.training_dir, name, ds)
    }

    /// Write the held-out records as `<test_dir>/<name>.json`
    pub fn save_held_out(&self, name: &str, ds: &Dataset) -> Result<PathBuf, PipelineError> {
        Self::write(&self.test_dir, name, ds)
    }

    fn write(dir: &Path, name: &str, ds: &Dataset) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.json"));

        let json = ds
            .to_json_string()
            .map_err(|e| PipelineError::Io(e.into()))?;
        fs::write(&path, json)?;

        tracing::debug!("Wrote {} records to '{}'", ds.len(), path.display());
        Ok(path)
    }

    /// Read evaluation data from a JSON file, or from every `*.json`
    /// file of a directory (in file-name order, concatenated).
    pub fn read(path: &Path) -> Result<Dataset, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::Evaluation(format!(
                "test data not found at '{}'",
                path.display()
            )));
        }

        if path.is_file() {
            return Dataset::from_json_str(&fs::read_to_string(path)?);
        }

        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(PipelineError::Evaluation(format!(
                "no .json files in '{}'",
                path.display()
            )));
        }

        let mut records = Vec::new();
        for file in &files {
            let ds = Dataset::from_json_str(&fs::read_to_string(file)?)?;
            tracing::debug!("Read {} records from '{}'", ds.len(), file.display());
            records.extend(ds.to_records());
        }
        Ok(Dataset::from_records(records))
    }
}
