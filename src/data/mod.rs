// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the corpus file on disk and the encoded
// sequences the model trains on:
//
//   queries.json
//       │
//       ▼
//   CorpusLoader      → parses and validates the labelled pairs
//       │
//       ▼
//   Vocabulary        → tokenises and maps tokens to indices
//       │                (lives in Layer 5, src/ml/vocab.rs)
//       ▼
//   Trainer           → consumes the encoded pairs
//
// The loader is strict: one malformed record rejects the whole
// file, so the training loop never has to inspect raw text.

/// Loads and validates the JSON corpus of NL→SQL pairs
pub mod corpus;
