// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No cleaning rules or parsing here (Layer 4)
//   - No printing here (Layer 1)
//   - No direct HTTP or process handling (Layers 4 and 5)
//   - Only workflow sequencing and error propagation

// Fetch + clean, no training
pub mod prepare_use_case;

// The full training pipeline
pub mod train_use_case;

// Scoring a trained artifact on held-out data
pub mod evaluate_use_case;
