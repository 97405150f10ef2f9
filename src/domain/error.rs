// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the core can report, as one enum.
//
// The split matters to callers:
//   Io                — a file could not be read or written
//   Format            — the corpus parsed but a record is malformed
//   ModelNotReady     — train/save/predict called before a
//                       translator was ever constructed
//   DimensionMismatch — loaded weights disagree with the loaded
//                       vocabulary sizes
//
// Core modules return ModelError; the application layer wraps it
// in anyhow::Result at the boundary, so the CLI decides whether a
// failure is fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A checkpoint artifact, vocabulary file, or corpus file
    /// could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus is malformed — not valid JSON, or a record is
    /// missing a required field.
    #[error("corpus format error: {0}")]
    Format(String),

    /// An operation that needs a constructed translator was
    /// called before `load_dataset` or `load` ever succeeded.
    #[error("model not ready: {0}")]
    ModelNotReady(&'static str),

    /// Loaded weight shapes disagree with the vocabularies they
    /// were loaded alongside.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}
