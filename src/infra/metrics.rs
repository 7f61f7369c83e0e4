// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one row per evaluation to a CSV file so results of
// successive training runs can be compared.
//
// Output file: <training.output_dir>/evaluation.csv
//
//   artifact,total,correct,skipped,accuracy
//   models/20240101-120000.tar.gz,120,103,4,0.858333
//   models/20240102-093000.tar.gz,120,109,4,0.908333
//
// The header is written only when the file is new.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Result of scoring one artifact on held-out data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub artifact: PathBuf,
    /// Records that had both a text and a label
    pub total:    usize,
    /// Records whose predicted intent matched the label
    pub correct:  usize,
    /// Records without a usable text or label
    pub skipped:  usize,
    /// correct / total, in [0.0, 1.0]
    pub accuracy: f64,
}

impl EvaluationReport {
    pub fn new(artifact: PathBuf, total: usize, correct: usize, skipped: usize) -> Self {
        let accuracy = if total > 0 { correct as f64 / total as f64 } else { 0.0 };
        Self { artifact, total, correct, skipped, accuracy }
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Open (or create) `<dir>/evaluation.csv`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("evaluation.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "artifact,total,correct,skipped,accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, r: &EvaluationReport) -> Result<(), PipelineError> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{:.6}",
            csv_field(&r.artifact.display().to_string()),
            r.total,
            r.correct,
            r.skipped,
            r.accuracy,
        )?;

        tracing::debug!(
            "Logged evaluation of '{}': accuracy={:.4}",
            r.artifact.display(),
            r.accuracy
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

/// Quote a field that contains a comma, quote or line break
/// (RFC 4180: embedded quotes are doubled).
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
