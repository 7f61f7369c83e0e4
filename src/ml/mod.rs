// ============================================================
// Layer 5 — ML Collaborators
// ============================================================
// The model itself is owned by the external conversational-AI
// framework. This layer holds the thin adapters that reach it:
//
//   trainer.rs   — CommandTrainer: runs the framework's `train`
//                  command and reports the artifact it produced
//
//   model.rs     — RasaHttpModel / ArtifactModelLoader: a loaded
//                  model answering parse requests over HTTP
//
//   evaluator.rs — intent accuracy of a model on held-out data

/// External training invocation
pub mod trainer;

/// Chat model handle and loader
pub mod model;

/// Held-out evaluation
pub mod evaluator;
