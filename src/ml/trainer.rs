// ============================================================
// Layer 5 — Trainer
// ============================================================
// Drives the full lifecycle of one translator:
//
//   load_dataset → build vocabularies → size a fresh Translator
//   train        → teacher-forced loop, one example at a time
//   save / load  → the 4-artifact checkpoint contract
//   predict      → encode, generate, decode
//
// Key Burn insight:
//   - Training runs on an Autodiff backend for gradients
//   - model.valid() strips gradient tracking for inference
//     without changing the math of any forward call
//
// Everything is single-threaded and synchronous: no batching,
// examples visited in corpus order, so a fixed initialization
// makes a whole training run deterministic.

use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::corpus::CorpusLoader;
use crate::domain::error::ModelError;
use crate::domain::training_example::TrainingExample;
use crate::infra::checkpoint::CheckpointPaths;
use crate::ml::translator::{Translator, TranslatorConfig, MAX_GENERATE_STEPS};
use crate::ml::vocab::Vocabulary;

/// The backend the application trains and serves on.
/// NdArray keeps the whole pipeline on CPU — the training loop
/// is strictly one example at a time, so there is nothing for a
/// GPU to batch over.
pub type DefaultBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Owns the dataset, both vocabularies, and the translator they
/// size. The translator only exists after a successful
/// `load_dataset` or `load` — every operation that needs one
/// fails with `ModelNotReady` before that.
pub struct Trainer<B: AutodiffBackend> {
    device: B::Device,
    embedding_dim: usize,
    hidden_dim: usize,
    dataset: Vec<TrainingExample>,
    nl_vocab: Vocabulary,
    sql_vocab: Vocabulary,
    translator: Option<Translator<B>>,
}

impl<B: AutodiffBackend> Trainer<B> {
    pub fn new(device: B::Device, embedding_dim: usize, hidden_dim: usize) -> Self {
        Self {
            device,
            embedding_dim,
            hidden_dim,
            dataset: Vec::new(),
            nl_vocab: Vocabulary::new(),
            sql_vocab: Vocabulary::new(),
            translator: None,
        }
    }

    /// True once a translator has been constructed.
    pub fn is_ready(&self) -> bool {
        self.translator.is_some()
    }

    pub fn example_count(&self) -> usize {
        self.dataset.len()
    }

    pub fn nl_vocab(&self) -> &Vocabulary {
        &self.nl_vocab
    }

    pub fn sql_vocab(&self) -> &Vocabulary {
        &self.sql_vocab
    }

    /// Load a labelled corpus and rebuild everything derived
    /// from it.
    ///
    /// All-or-nothing: a parse failure leaves the previous
    /// dataset, vocabularies, and translator untouched. On
    /// success the vocabularies are rebuilt from scratch and a
    /// NEW translator is sized to them — any previously trained
    /// weights are discarded, because old weights cannot be
    /// valid against renumbered vocabularies.
    pub fn load_dataset(&mut self, path: &str) -> Result<(), ModelError> {
        let examples = CorpusLoader::load(path)?;

        let mut nl_vocab = Vocabulary::new();
        let mut sql_vocab = Vocabulary::new();
        for example in &examples {
            nl_vocab.add_corpus_text(&example.nl);
            sql_vocab.add_corpus_text(&example.sql);
        }

        tracing::info!(
            "Vocabularies built: {} NL tokens, {} SQL tokens",
            nl_vocab.size(),
            sql_vocab.size()
        );

        let translator = self.sized_translator(nl_vocab.size(), sql_vocab.size());

        self.dataset = examples;
        self.nl_vocab = nl_vocab;
        self.sql_vocab = sql_vocab;
        self.translator = Some(translator);
        Ok(())
    }

    /// Run the teacher-forced optimization loop.
    ///
    /// For each epoch, for each example in corpus order: encode
    /// both sides, forward with teacher forcing, backpropagate,
    /// and apply one Adam step at `lr`. Returns the per-epoch
    /// mean losses (observability only — the weights are the
    /// real output).
    pub fn train(&mut self, epochs: usize, lr: f64) -> Result<Vec<f64>, ModelError> {
        let mut model = self
            .translator
            .take()
            .ok_or(ModelError::ModelNotReady("train called before load_dataset"))?;

        // m = β1*m + (1-β1)*g        (mean)
        // v = β2*v + (1-β2)*g²       (variance)
        // θ = θ - lr * m / (√v + ε)  (update)
        let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

        let mut epoch_losses = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            let mut loss_sum = 0.0f64;
            let mut example_count = 0usize;

            for example in &self.dataset {
                let source = self.nl_vocab.encode(&example.nl);
                let target = self.sql_vocab.encode(&example.sql);

                let loss = model.forward_train(&source, &target, &self.device);
                loss_sum += loss.clone().into_scalar().elem::<f64>();
                example_count += 1;

                // Backward pass + Adam update
                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(lr, model, grads);
            }

            let mean_loss = if example_count > 0 {
                loss_sum / example_count as f64
            } else {
                f64::NAN
            };
            epoch_losses.push(mean_loss);

            println!("Epoch {:>3}/{} | loss={:.4}", epoch, epochs, mean_loss);

            // Show a couple of sample translations every 5 epochs
            // so a long run is inspectable while it happens.
            if epoch % 5 == 0 {
                for example in self.dataset.iter().take(2) {
                    let predicted = self.predict_with(&model, &example.nl);
                    println!("  NL:   {}", example.nl);
                    println!("  Pred: {}", predicted);
                    println!("  True: {}", example.sql);
                }
            }
        }

        self.translator = Some(model);
        tracing::info!("Training complete ({} epochs)", epochs);
        Ok(epoch_losses)
    }

    /// Persist the full checkpoint: encoder weights, decoder
    /// weights, and both vocabulary files under one base path.
    pub fn save(&self, base: &str) -> Result<(), ModelError> {
        let translator = self
            .translator
            .as_ref()
            .ok_or(ModelError::ModelNotReady("save called before load_dataset"))?;

        let paths = CheckpointPaths::new(base);
        paths.ensure_parent_dir()?;

        translator.save(base)?;
        self.nl_vocab.save(paths.nl_vocab())?;
        self.sql_vocab.save(paths.sql_vocab())?;

        tracing::info!("Checkpoint saved under '{base}'");
        Ok(())
    }

    /// Restore a checkpoint saved by `save`.
    ///
    /// Order matters: both vocabularies load first, a fresh
    /// translator is sized to them, and only then are the
    /// weights restored into it. All four artifacts must be
    /// present, and the restored weight shapes must agree with
    /// the vocabulary sizes — otherwise nothing is mutated.
    pub fn load(&mut self, base: &str) -> Result<(), ModelError> {
        let paths = CheckpointPaths::new(base);

        let mut nl_vocab = Vocabulary::new();
        nl_vocab.load(paths.nl_vocab())?;
        let mut sql_vocab = Vocabulary::new();
        sql_vocab.load(paths.sql_vocab())?;

        let translator = self
            .sized_translator(nl_vocab.size(), sql_vocab.size())
            .load(base, &self.device)?;

        // The recorder restores whatever shapes were saved; the
        // checkpoint is only consistent if those shapes match the
        // vocabularies that came with it.
        let encoder_rows = translator.encoder.embedding.weight.val().dims()[0];
        let decoder_cols = translator.decoder.fc.weight.val().dims()[1];
        if encoder_rows != nl_vocab.size() || decoder_cols != sql_vocab.size() {
            return Err(ModelError::DimensionMismatch(format!(
                "checkpoint '{base}': encoder embeds {encoder_rows} tokens but NL vocabulary \
                 has {}, decoder scores {decoder_cols} tokens but SQL vocabulary has {}",
                nl_vocab.size(),
                sql_vocab.size(),
            )));
        }

        self.nl_vocab = nl_vocab;
        self.sql_vocab = sql_vocab;
        self.translator = Some(translator);

        tracing::info!("Checkpoint loaded from '{base}'");
        Ok(())
    }

    /// Translate one natural language query to SQL.
    ///
    /// Inference mutates nothing: the model runs on the inner
    /// (gradient-free) backend, so repeated calls with the same
    /// input produce the same output.
    pub fn predict(&self, text: &str) -> Result<String, ModelError> {
        let translator = self
            .translator
            .as_ref()
            .ok_or(ModelError::ModelNotReady("predict called before a model exists"))?;
        Ok(self.predict_with(translator, text))
    }

    fn predict_with(&self, translator: &Translator<B>, text: &str) -> String {
        let model = translator.valid();
        let source = self.nl_vocab.encode(text);
        let generated = model.generate(&source, MAX_GENERATE_STEPS, &self.device);
        self.sql_vocab.decode(&generated)
    }

    fn sized_translator(&self, source_vocab: usize, target_vocab: usize) -> Translator<B> {
        TranslatorConfig::new(source_vocab, target_vocab)
            .with_embedding_dim(self.embedding_dim)
            .with_hidden_dim(self.hidden_dim)
            .init(&self.device)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    type TestBackend = DefaultBackend;

    const CORPUS: &str = r#"{"examples": [
        {"nl": "show all users", "sql": "SELECT * FROM users;"},
        {"nl": "count all products", "sql": "SELECT COUNT(*) FROM products;"}
    ]}"#;

    fn small_trainer() -> Trainer<TestBackend> {
        // Tiny dims keep the LSTM unrolls fast in tests.
        Trainer::new(Default::default(), 8, 16)
    }

    fn write_corpus(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("queries.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_operations_fail_before_dataset_loaded() {
        let mut trainer = small_trainer();
        assert!(matches!(
            trainer.train(1, 1e-3).unwrap_err(),
            ModelError::ModelNotReady(_)
        ));
        assert!(matches!(
            trainer.save("anywhere").unwrap_err(),
            ModelError::ModelNotReady(_)
        ));
        assert!(matches!(
            trainer.predict("show all users").unwrap_err(),
            ModelError::ModelNotReady(_)
        ));
    }

    #[test]
    fn test_load_dataset_builds_vocabularies_and_model() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(&dir, CORPUS);

        let mut trainer = small_trainer();
        trainer.load_dataset(&corpus).unwrap();

        assert!(trainer.is_ready());
        assert_eq!(trainer.example_count(), 2);
        // 4 reserved + {show, all, users, count, products}
        assert_eq!(trainer.nl_vocab().size(), 9);
        assert!(trainer.sql_vocab().size() > 4);
    }

    #[test]
    fn test_failed_reload_preserves_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(&dir, CORPUS);

        let mut trainer = small_trainer();
        trainer.load_dataset(&corpus).unwrap();
        let nl_size = trainer.nl_vocab().size();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"examples": [{"nl": "no sql field"}]}"#).unwrap();
        let err = trainer.load_dataset(&bad.to_string_lossy()).unwrap_err();
        assert!(matches!(err, ModelError::Format(_)));

        // The first load survives intact.
        assert!(trainer.is_ready());
        assert_eq!(trainer.example_count(), 2);
        assert_eq!(trainer.nl_vocab().size(), nl_size);
        assert!(trainer.predict("show all users").is_ok());
    }

    #[test]
    fn test_untrained_model_predicts_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(&dir, CORPUS);

        let mut trainer = small_trainer();
        trainer.load_dataset(&corpus).unwrap();

        // Random weights — the content is unconstrained, but the
        // call must succeed and decode cleanly.
        assert!(trainer.predict("show all users").is_ok());
    }

    #[test]
    fn test_train_reports_one_mean_loss_per_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(&dir, CORPUS);

        let mut trainer = small_trainer();
        trainer.load_dataset(&corpus).unwrap();

        let losses = trainer.train(2, 1e-2).unwrap();
        assert_eq!(losses.len(), 2);
        assert!(losses.iter().all(|l| l.is_finite()));
        assert!(trainer.is_ready());
    }

    #[test]
    fn test_checkpoint_roundtrip_reproduces_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(&dir, CORPUS);
        let base = dir.path().join("model").to_string_lossy().into_owned();

        let mut original = small_trainer();
        original.load_dataset(&corpus).unwrap();
        original.train(1, 1e-2).unwrap();
        original.save(&base).unwrap();
        let expected = original.predict("show all users").unwrap();

        let mut restored = small_trainer();
        restored.load(&base).unwrap();
        assert_eq!(restored.nl_vocab().size(), original.nl_vocab().size());
        assert_eq!(restored.predict("show all users").unwrap(), expected);
    }

    #[test]
    fn test_load_with_missing_artifacts_fails() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("never_saved").to_string_lossy().into_owned();

        let mut trainer = small_trainer();
        let err = trainer.load(&base).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
        assert!(!trainer.is_ready());
    }

    #[test]
    fn test_load_with_inconsistent_vocabulary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(&dir, CORPUS);
        let base = dir.path().join("model").to_string_lossy().into_owned();

        let mut trainer = small_trainer();
        trainer.load_dataset(&corpus).unwrap();
        trainer.save(&base).unwrap();

        // Grow the saved NL vocabulary by one token so it no
        // longer matches the saved encoder embedding.
        let vocab_path = format!("{base}_nl_vocab.txt");
        let contents = std::fs::read_to_string(&vocab_path).unwrap();
        let mut lines: Vec<String> = contents.lines().map(String::from).collect();
        let next: usize = lines[0].parse().unwrap();
        lines[0] = (next + 1).to_string();
        lines.push(format!("smuggled\t{next}"));
        std::fs::write(&vocab_path, lines.join("\n")).unwrap();

        let mut restored = small_trainer();
        let err = restored.load(&base).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch(_)));
        assert!(!restored.is_ready());
    }
}
