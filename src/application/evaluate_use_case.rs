// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a trained artifact on held-out data:
//
//   Step 1: Read the test records   (file or directory of *.json)
//   Step 2: Load the model          (ModelLoader)
//   Step 3: Score intent accuracy   (Layer 5 - ml)
//   Step 4: Append to evaluation.csv in the output directory

use std::path::Path;
use std::sync::Arc;

use crate::domain::error::PipelineError;
use crate::domain::traits::ModelLoader;
use crate::infra::config::Configuration;
use crate::infra::dataset_store::DatasetStore;
use crate::infra::metrics::{EvaluationReport, MetricsLogger};
use crate::ml::evaluator::Evaluator;

pub struct EvaluateUseCase {
    config: Configuration,
    loader: Arc<dyn ModelLoader>,
}

impl EvaluateUseCase {
    pub fn new(config: Configuration, loader: Arc<dyn ModelLoader>) -> Self {
        Self { config, loader }
    }

    pub fn evaluate(
        &self,
        artifact_path:  &Path,
        test_data_path: &Path,
    ) -> Result<EvaluationReport, PipelineError> {
        tracing::info!(
            "Evaluating model '{}' on '{}'",
            artifact_path.display(),
            test_data_path.display()
        );

        let data = DatasetStore::read(test_data_path)?;

        let model = self.loader.load(artifact_path).map_err(|e| {
            PipelineError::Evaluation(format!(
                "cannot load model '{}': {e:#}",
                artifact_path.display()
            ))
        })?;

        let report = Evaluator::new(model.as_ref(), self.config.training.label_column.as_str())
            .evaluate(artifact_path.to_path_buf(), &data)?;

        let logger = MetricsLogger::new(&self.config.training.output_dir)?;
        logger.log(&report)?;
        tracing::info!(
            "Accuracy {:.4} on {} records, logged to '{}'",
            report.accuracy,
            report.total,
            logger.csv_path().display()
        );
        Ok(report)
    }
}
