// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by several layers:
//
//   config.rs        — ConfigSource: reads config.yaml once into a
//                      typed Configuration with central defaults.
//
//   dataset_store.rs — Writes cleaned / held-out datasets as JSON
//                      files for the training framework and reads
//                      held-out files back for evaluation.
//
//   metrics.rs       — Appends evaluation results to a CSV file.

/// Typed configuration and its loader
pub mod config;

/// Materialization of datasets on disk
pub mod dataset_store;

/// Evaluation report and CSV logger
pub mod metrics;
