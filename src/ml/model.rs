// ============================================================
// Layer 5 — Encoder / Decoder Architecture
// ============================================================
// A classic seq2seq pair built from Burn's building blocks:
//
//   Encoder: Embedding → LSTM
//     Consumes the whole source index sequence and returns only
//     the final recurrent state — a fixed-size summary of the
//     sentence, regardless of its length.
//
//   Decoder: Embedding → LSTM → Linear
//     Unrolls ONE output position per call: previous token in,
//     score vector over the target vocabulary out, plus the
//     updated state.
//
// The recurrent state is threaded explicitly as a value —
// the modules hold weights only, never sequence state. Each
// forward call is a pure function of (weights, inputs, state),
// which is what makes teacher forcing and greedy generation
// testable in isolation.

use burn::{
    nn::{
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig, LstmState,
    },
    prelude::*,
};

// ─── RecurrentState ───────────────────────────────────────────────────────────

/// The fixed-size summary carried between sequence steps.
///
/// Both tensors have shape `[1, hidden_dim]` (batch of one —
/// the system trains one example at a time). Opaque to callers:
/// the translator only passes it forward, never inspects it.
#[derive(Debug, Clone)]
pub struct RecurrentState<B: Backend> {
    pub hidden: Tensor<B, 2>,
    pub cell: Tensor<B, 2>,
}

// ─── Encoder ──────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct EncoderConfig {
    pub vocab_size: usize,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
}

impl EncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        Encoder {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device),
            lstm: LstmConfig::new(self.embedding_dim, self.hidden_dim, true).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub lstm: Lstm<B>,
}

impl<B: Backend> Encoder<B> {
    /// Compress a source index sequence into its final state.
    ///
    /// input: `[1, seq_len]` (Int) — the full SOS..EOS sequence.
    pub fn forward(&self, input: Tensor<B, 2, Int>) -> RecurrentState<B> {
        let embedded = self.embedding.forward(input); // [1, seq_len, emb]
        let (_, state) = self.lstm.forward(embedded, None);
        RecurrentState { hidden: state.hidden, cell: state.cell }
    }
}

// ─── Decoder ──────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct DecoderConfig {
    pub vocab_size: usize,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
}

impl DecoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Decoder<B> {
        Decoder {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device),
            lstm: LstmConfig::new(self.embedding_dim, self.hidden_dim, true).init(device),
            fc: LinearConfig::new(self.hidden_dim, self.vocab_size).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub lstm: Lstm<B>,
    pub fc: Linear<B>,
}

impl<B: Backend> Decoder<B> {
    /// Unroll one output position.
    ///
    /// token: `[1, 1]` (Int) — the previous target token.
    /// Returns the score vector `[1, target_vocab_size]` and the
    /// updated state.
    pub fn forward(
        &self,
        token: Tensor<B, 2, Int>,
        state: RecurrentState<B>,
    ) -> (Tensor<B, 2>, RecurrentState<B>) {
        let embedded = self.embedding.forward(token); // [1, 1, emb]
        let (_, next) = self
            .lstm
            .forward(embedded, Some(LstmState::new(state.cell, state.hidden)));

        // For a single-step unroll the LSTM output at the last
        // (only) position equals the new hidden state.
        let scores = self.fc.forward(next.hidden.clone()); // [1, vocab]

        (scores, RecurrentState { hidden: next.hidden, cell: next.cell })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn index_tensor(indices: &[usize], device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 2, Int> {
        let values: Vec<i32> = indices.iter().map(|&i| i as i32).collect();
        Tensor::<TestBackend, 1, Int>::from_ints(values.as_slice(), device)
            .reshape([1, indices.len()])
    }

    #[test]
    fn test_encoder_state_shape_is_fixed() {
        let device = Default::default();
        let encoder = EncoderConfig::new(10, 8, 16).init::<TestBackend>(&device);

        // Two inputs of different lengths summarise to the same shape.
        let short = encoder.forward(index_tensor(&[1, 4, 2], &device));
        let long = encoder.forward(index_tensor(&[1, 4, 5, 6, 7, 2], &device));

        assert_eq!(short.hidden.dims(), [1, 16]);
        assert_eq!(short.cell.dims(), [1, 16]);
        assert_eq!(long.hidden.dims(), [1, 16]);
    }

    #[test]
    fn test_decoder_scores_cover_target_vocab() {
        let device = Default::default();
        let encoder = EncoderConfig::new(10, 8, 16).init::<TestBackend>(&device);
        let decoder = DecoderConfig::new(12, 8, 16).init::<TestBackend>(&device);

        let state = encoder.forward(index_tensor(&[1, 4, 2], &device));
        let (scores, next) = decoder.forward(index_tensor(&[1], &device), state);

        assert_eq!(scores.dims(), [1, 12]);
        assert_eq!(next.hidden.dims(), [1, 16]);
        assert_eq!(next.cell.dims(), [1, 16]);
    }

    #[test]
    fn test_encoder_is_deterministic() {
        let device = Default::default();
        let encoder = EncoderConfig::new(10, 8, 16).init::<TestBackend>(&device);

        let a = encoder.forward(index_tensor(&[1, 4, 5, 2], &device));
        let b = encoder.forward(index_tensor(&[1, 4, 5, 2], &device));

        let diff: f32 = (a.hidden - b.hidden).abs().sum().into_scalar();
        assert_eq!(diff, 0.0);
    }
}
