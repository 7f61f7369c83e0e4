// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits that name the concepts of the
// pipeline: what a record is, what a training run produced, what
// can go wrong, and which collaborators the pipeline talks to.
//
// Rules for this layer:
//   - NO network or file I/O
//   - NO HTTP framework types
//   - Only data types, the error taxonomy and traits
//
// The external training framework and the chat model live behind
// the traits in `traits.rs`; everything else depends on those.

// Typed pipeline error taxonomy
pub mod error;

// One fetched conversational example
pub mod record;

// The immutable result of one orchestration run
pub mod training_run;

// Collaborator seams (dataset source, trainer, chat model)
pub mod traits;
