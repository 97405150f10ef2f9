// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one.
//
// What's in this layer:
//
//   vocab.rs      — Vocabulary: token↔index maps with reserved
//                   PAD/SOS/EOS/UNK, the tokenizer rule, and
//                   the TSV persistence format
//
//   model.rs      — Encoder (Embedding → LSTM) and
//                   Decoder (Embedding → LSTM → Linear), with
//                   the explicit RecurrentState threaded
//                   through every call
//
//   translator.rs — The seq2seq orchestrator: teacher-forced
//                   training pass, greedy generation pass, and
//                   two-artifact weight persistence
//
//   trainer.rs    — The full lifecycle: corpus → vocabularies →
//                   sized translator → Adam loop → checkpoint →
//                   prediction
//
// Reference: Sutskever et al. (2014) Sequence to Sequence
//            Learning with Neural Networks

/// Token↔index vocabularies with reserved control tokens
pub mod vocab;

/// Encoder/Decoder architecture and the recurrent state type
pub mod model;

/// Teacher-forced training and greedy generation passes
pub mod translator;

/// Dataset ingestion, optimization loop, checkpointing, prediction
pub mod trainer;
