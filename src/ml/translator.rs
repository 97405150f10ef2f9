// ============================================================
// Layer 5 — Translator
// ============================================================
// Owns one Encoder and one Decoder and exposes the two passes
// that differ between training and inference:
//
//   forward_train — teacher forcing. The decoder is always fed
//     the TRUE previous target token, never its own prediction,
//     so one bad early guess cannot derail the rest of the
//     sequence while the weights are still random.
//
//   generate — greedy autoregressive decoding. The decoder is
//     fed its own previous argmax pick, stopping on EOS or after
//     max_steps, whichever comes first. Greedy is deliberate:
//     beam search or sampling would be a separate decoding
//     policy layered on the same Decoder contract.
//
// Weights persist as two independent CompactRecorder artifacts,
// `{base}_encoder` and `{base}_decoder`; a load only succeeds if
// both restore cleanly into a translator of the right shape.

use std::path::PathBuf;

use burn::{
    nn::loss::CrossEntropyLossConfig,
    prelude::*,
    record::{CompactRecorder, Recorder, RecorderError},
};

use crate::domain::error::ModelError;
use crate::ml::model::{Decoder, DecoderConfig, Encoder, EncoderConfig};
use crate::ml::vocab::{EOS_TOKEN, PAD_TOKEN, SOS_TOKEN};

/// Default cap on generated sequence length. Guarantees
/// `generate` halts even for weights that never emit EOS.
pub const MAX_GENERATE_STEPS: usize = 50;

// NOTE: #[derive(Config)] already generates Clone and
// Serialize/Deserialize internally — do NOT add them again.
#[derive(Config, Debug)]
pub struct TranslatorConfig {
    pub source_vocab_size: usize,
    pub target_vocab_size: usize,
    #[config(default = 256)]
    pub embedding_dim: usize,
    #[config(default = 512)]
    pub hidden_dim: usize,
}

impl TranslatorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Translator<B> {
        let encoder =
            EncoderConfig::new(self.source_vocab_size, self.embedding_dim, self.hidden_dim)
                .init(device);
        let decoder =
            DecoderConfig::new(self.target_vocab_size, self.embedding_dim, self.hidden_dim)
                .init(device);
        Translator { encoder, decoder }
    }
}

#[derive(Module, Debug)]
pub struct Translator<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

/// Shape an index slice as the `[1, len]` Int tensor the
/// embedding layers expect.
fn index_tensor<B: Backend>(indices: &[usize], device: &B::Device) -> Tensor<B, 2, Int> {
    let values: Vec<i32> = indices.iter().map(|&i| i as i32).collect();
    Tensor::<B, 1, Int>::from_ints(values.as_slice(), device).reshape([1, indices.len()])
}

/// A missing artifact is an I/O problem; anything else the
/// recorder rejects means the weights do not fit this translator.
fn checkpoint_error(artifact: &str, error: RecorderError) -> ModelError {
    match error {
        RecorderError::FileNotFound(path) => ModelError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("missing {artifact} checkpoint artifact: {path}"),
        )),
        other => ModelError::DimensionMismatch(format!("{artifact} weights: {other}")),
    }
}

impl<B: Backend> Translator<B> {
    /// Teacher-forced training pass.
    ///
    /// Encodes `source` once, then for each target position
    /// t = 1..len-1 feeds the true token at t-1 into the decoder
    /// and scores the prediction against the true token at t.
    /// Position 0 (SOS) is never a prediction target, and any
    /// PAD-valued target position is excluded from the loss.
    ///
    /// Returns the mean cross-entropy loss over the scored
    /// positions.
    pub fn forward_train(
        &self,
        source: &[usize],
        target: &[usize],
        device: &B::Device,
    ) -> Tensor<B, 1> {
        // An encoded target is always at least [SOS, EOS]; a
        // shorter one has nothing to predict.
        if source.is_empty() || target.len() < 2 {
            return Tensor::zeros([1], device);
        }

        let mut state = self.encoder.forward(index_tensor(source, device));

        // The decoder state advances through every position, but
        // only non-PAD targets are scored. Dropping PAD positions
        // here keeps the mean over scored positions exact, instead
        // of letting zeroed PAD terms dilute it.
        let mut step_scores = Vec::with_capacity(target.len() - 1);
        let mut scored_targets: Vec<i32> = Vec::with_capacity(target.len() - 1);
        for t in 1..target.len() {
            let previous = index_tensor(&target[t - 1..t], device);
            let (scores, next) = self.decoder.forward(previous, state);
            state = next;

            if target[t] != PAD_TOKEN {
                step_scores.push(scores);
                scored_targets.push(target[t] as i32);
            }
        }

        if step_scores.is_empty() {
            return Tensor::zeros([1], device);
        }

        let logits = Tensor::cat(step_scores, 0); // [scored, vocab]
        let targets = Tensor::<B, 1, Int>::from_ints(scored_targets.as_slice(), device);

        CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, targets)
    }

    /// Greedy autoregressive generation.
    ///
    /// Encodes `source` once, starts from SOS, and repeatedly
    /// feeds the argmax pick back in. EOS stops generation and
    /// is not appended; `max_steps` bounds the loop so the call
    /// can never run forever.
    pub fn generate(&self, source: &[usize], max_steps: usize, device: &B::Device) -> Vec<usize> {
        if source.is_empty() {
            return Vec::new();
        }

        let mut state = self.encoder.forward(index_tensor(source, device));
        let mut current = SOS_TOKEN;
        let mut result = Vec::new();

        for _ in 0..max_steps {
            let (scores, next) = self.decoder.forward(index_tensor(&[current], device), state);
            state = next;

            let choice = scores.argmax(1).into_scalar().elem::<i64>() as usize;
            if choice == EOS_TOKEN {
                break;
            }
            result.push(choice);
            current = choice;
        }

        result
    }

    /// Persist encoder and decoder weights under `base`.
    /// Both artifacts must be written or the save fails.
    pub fn save(&self, base: &str) -> Result<(), ModelError> {
        let recorder = CompactRecorder::new();

        recorder
            .record(
                self.encoder.clone().into_record(),
                PathBuf::from(format!("{base}_encoder")),
            )
            .map_err(|e| ModelError::Io(std::io::Error::other(e.to_string())))?;

        recorder
            .record(
                self.decoder.clone().into_record(),
                PathBuf::from(format!("{base}_decoder")),
            )
            .map_err(|e| ModelError::Io(std::io::Error::other(e.to_string())))?;

        tracing::debug!("Saved translator weights under '{base}'");
        Ok(())
    }

    /// Restore encoder and decoder weights from `base` into this
    /// translator. The translator must already be sized to the
    /// vocabularies the checkpoint was trained against — a shape
    /// disagreement fails the load.
    pub fn load(self, base: &str, device: &B::Device) -> Result<Self, ModelError> {
        let recorder = CompactRecorder::new();
        let Translator { encoder, decoder } = self;

        let encoder_record = recorder
            .load(PathBuf::from(format!("{base}_encoder")), device)
            .map_err(|e| checkpoint_error("encoder", e))?;
        let decoder_record = recorder
            .load(PathBuf::from(format!("{base}_decoder")), device)
            .map_err(|e| checkpoint_error("decoder", e))?;

        tracing::debug!("Restored translator weights from '{base}'");
        Ok(Translator {
            encoder: encoder.load_record(encoder_record),
            decoder: decoder.load_record(decoder_record),
        })
    }
}
