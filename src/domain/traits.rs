// ============================================================
// Layer 3 — Core Traits (Collaborator Seams)
// ============================================================
// The pipeline is written against these traits, not against
// concrete processes or models:
//
//   Trainer        → CommandTrainer shells out to the training wrapper
//   ModelLoader    → ArtifactModelLoader hands out a RasaHttpModel
//   ChatModel      → RasaHttpModel parses a message remotely
//
// Tests swap in small in-memory implementations. The dataset seam
// (`DatasetSource`) is defined by the data layer in data/loader.rs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::domain::error::PipelineError;
use crate::domain::training_run::TrainRequest;

// ─── Trainer ──────────────────────────────────────────────────────────────────
/// The external training framework.
///
/// Returns the path of the artifact it produced.
pub trait Trainer {
    fn train(&self, request: &TrainRequest) -> Result<PathBuf, PipelineError>;
}

// ─── ChatModel ────────────────────────────────────────────────────────────────
/// A loaded model that can interpret one user message.
///
/// The result is the framework's parse document, e.g.
/// `{"intent": {"name": "greet", "confidence": 0.97}, "entities": []}`.
pub trait ChatModel: Send + Sync {
    fn parse(&self, message: &str) -> Result<Value>;
}

// ─── ModelLoader ──────────────────────────────────────────────────────────────
/// Turns a training artifact into a usable ChatModel.
pub trait ModelLoader: Send + Sync {
    fn load(&self, artifact: &Path) -> Result<Arc<dyn ChatModel>>;
}
