// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the remote endpoint and the files handed to
// the training framework:
//
//   dataset.url (JSON array)
//       │
//       ▼
//   HttpDatasetLoader  → fetches and parses into a Dataset
//       │
//       ▼
//   Preprocessor       → dedup / drop null / lowercase on `text`
//       │
//       ▼
//   split_holdout      → optional seeded train / held-out split
//       │
//       ▼
//   DatasetStore       → (infra) writes the JSON files for training
//
// Each module does exactly one step and is tested on its own.

/// Column-oriented in-memory table
pub mod dataset;

/// Fetches the raw dataset over HTTP
pub mod loader;

/// Deterministic cleaning rules
pub mod preprocessor;

/// Seeded train / held-out split
pub mod splitter;
