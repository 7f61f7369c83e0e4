// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a ChatModel on labelled held-out data.
//
// Metric: intent accuracy.
//   - a row is scored if its `text` is a string and its label
//     column (default `intent`) is a string
//   - it is correct if the model's `/intent/name` equals the label
//   - accuracy = correct / scored
//
// Rows that cannot be scored are counted as skipped. A model error
// on any row aborts the evaluation.

use std::path::PathBuf;

use serde_json::Value;

use crate::data::dataset::Dataset;
use crate::domain::error::PipelineError;
use crate::domain::record::TEXT_COLUMN;
use crate::domain::traits::ChatModel;
use crate::infra::metrics::EvaluationReport;
use crate::ml::model::predicted_intent;

pub struct Evaluator<'a> {
    model:        &'a dyn ChatModel,
    label_column: String,
}

impl<'a> Evaluator<'a> {
    pub fn new(model: &'a dyn ChatModel, label_column: impl Into<String>) -> Self {
        Self { model, label_column: label_column.into() }
    }

    pub fn evaluate(&self, artifact: PathBuf, ds: &Dataset) -> Result<EvaluationReport, PipelineError> {
        let (Some(texts), Some(labels)) = (ds.column(TEXT_COLUMN), ds.column(&self.label_column)) else {
            return Err(PipelineError::Evaluation(format!(
                "test data needs '{}' and '{}' columns",
                TEXT_COLUMN, self.label_column
            )));
        };

        let mut total   = 0usize;
        let mut correct = 0usize;
        let mut skipped = 0usize;

        for (text, label) in texts.iter().zip(labels) {
            let (Value::String(text), Value::String(label)) = (text, label) else {
                skipped += 1;
                continue;
            };

            let parse = self
                .model
                .parse(text)
                .map_err(|e| PipelineError::Evaluation(format!("model failed on '{text}': {e:#}")))?;

            total += 1;
            if predicted_intent(&parse) == Some(label.as_str()) {
                correct += 1;
            }
        }

        if total == 0 {
            return Err(PipelineError::Evaluation(format!(
                "no labelled examples to score ({skipped} skipped)"
            )));
        }

        let report = EvaluationReport::new(artifact, total, correct, skipped);
        tracing::info!(
            "Evaluated {} examples: {} correct, {} skipped, accuracy={:.4}",
            report.total,
            report.correct,
            report.skipped,
            report.accuracy
        );
        Ok(report)
    }
}
