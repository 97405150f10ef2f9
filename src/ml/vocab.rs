// ============================================================
// Layer 5 — Vocabulary
// ============================================================
// Bidirectional token↔index mapping with reserved control
// tokens. One Vocabulary per language side: the source side is
// built from natural language text, the target side from SQL.
//
// Index layout:
//   0 <PAD>  padding filler (excluded from the loss)
//   1 <SOS>  start of sequence
//   2 <EOS>  end of sequence
//   3 <UNK>  out-of-vocabulary token
//   4..      corpus tokens, assigned append-only in first-seen
//            order — indices never renumber, so a checkpoint's
//            vocabulary file stays valid for its weights
//
// File format (one file per vocabulary):
//   line 1:  next-free-index counter
//   line N:  token<TAB>index

use std::collections::HashMap;
use std::fmt::Write as _;
use std::{fs, path::Path};

use crate::domain::error::ModelError;

pub const PAD_TOKEN: usize = 0;
pub const SOS_TOKEN: usize = 1;
pub const EOS_TOKEN: usize = 2;
pub const UNK_TOKEN: usize = 3;

/// Characters that are both separators AND tokens in their own
/// right. SQL punctuation the model must be able to emit.
const PUNCTUATION: [char; 7] = [',', '(', ')', ';', '=', '<', '>'];

fn is_punctuation_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PUNCTUATION.contains(&c))
}

/// Token↔index mapping for one side of the translation task.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    token_to_index: HashMap<String, usize>,
    index_to_token: HashMap<usize, String>,
    next_index: usize,
}

impl Vocabulary {
    /// Create a vocabulary containing only the 4 reserved tokens.
    pub fn new() -> Self {
        let mut vocab = Self {
            token_to_index: HashMap::new(),
            index_to_token: HashMap::new(),
            next_index: 4,
        };
        for (token, index) in [
            ("<PAD>", PAD_TOKEN),
            ("<SOS>", SOS_TOKEN),
            ("<EOS>", EOS_TOKEN),
            ("<UNK>", UNK_TOKEN),
        ] {
            vocab.token_to_index.insert(token.to_string(), index);
            vocab.index_to_token.insert(index, token.to_string());
        }
        vocab
    }

    /// Insert a token if absent, assigning the next sequential
    /// index. Idempotent — a repeated token keeps its original
    /// index and the size does not change.
    pub fn add_token(&mut self, token: &str) -> usize {
        if let Some(&index) = self.token_to_index.get(token) {
            return index;
        }
        let index = self.next_index;
        self.token_to_index.insert(token.to_string(), index);
        self.index_to_token.insert(index, token.to_string());
        self.next_index += 1;
        index
    }

    /// Tokenise `text` and add every resulting token.
    pub fn add_corpus_text(&mut self, text: &str) {
        for token in Self::tokenize(text) {
            self.add_token(&token);
        }
    }

    /// Split text into lower-cased tokens.
    ///
    /// Alphanumeric and underscore characters accumulate into a
    /// pending token; any other character flushes it. The SQL
    /// punctuation characters `, ( ) ; = < >` are additionally
    /// emitted as one-character tokens; everything else (spaces,
    /// `*`, `.`, quotes, ...) separates only.
    pub fn tokenize(text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut pending = String::new();

        for c in text.chars() {
            if c.is_alphanumeric() || c == '_' {
                pending.extend(c.to_lowercase());
            } else {
                if !pending.is_empty() {
                    tokens.push(std::mem::take(&mut pending));
                }
                if PUNCTUATION.contains(&c) {
                    tokens.push(c.to_string());
                }
            }
        }
        if !pending.is_empty() {
            tokens.push(pending);
        }

        tokens
    }

    /// Map a token to its index, or UNK if unknown.
    pub fn index_of(&self, token: &str) -> usize {
        self.token_to_index.get(token).copied().unwrap_or(UNK_TOKEN)
    }

    /// Map an index back to its token, or `<UNK>` if unassigned.
    pub fn token_of(&self, index: usize) -> &str {
        self.index_to_token
            .get(&index)
            .map(String::as_str)
            .unwrap_or("<UNK>")
    }

    /// Tokenise and encode text as an index sequence, wrapped in
    /// SOS/EOS. Always returns at least `[SOS, EOS]`.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        let mut indices = vec![SOS_TOKEN];
        for token in Self::tokenize(text) {
            indices.push(self.index_of(&token));
        }
        indices.push(EOS_TOKEN);
        indices
    }

    /// Decode an index sequence back to text.
    ///
    /// PAD/SOS/EOS are stripped. Tokens are joined with single
    /// spaces, except punctuation tokens attach directly to the
    /// previous token — `["id", "=", "5"]` decodes to `"id= 5"`,
    /// matching the encoder's treatment of punctuation.
    pub fn decode(&self, indices: &[usize]) -> String {
        let mut result = String::new();

        for &index in indices {
            if index == PAD_TOKEN || index == SOS_TOKEN || index == EOS_TOKEN {
                continue;
            }
            let token = self.token_of(index);
            if !result.is_empty() && !is_punctuation_token(token) {
                result.push(' ');
            }
            result.push_str(token);
        }

        result
    }

    /// Number of distinct tokens, reserved tokens included.
    pub fn size(&self) -> usize {
        self.token_to_index.len()
    }

    /// Write the vocabulary to `path` in the TSV format above.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();

        let mut entries: Vec<(&String, &usize)> = self.token_to_index.iter().collect();
        entries.sort_by_key(|(_, &index)| index);

        let mut contents = format!("{}\n", self.next_index);
        for (token, index) in entries {
            let _ = writeln!(contents, "{token}\t{index}");
        }

        fs::write(path, contents)?;
        tracing::debug!("Saved vocabulary ({} tokens) to '{}'", self.size(), path.display());
        Ok(())
    }

    /// Replace this vocabulary with the contents of `path`.
    ///
    /// The file is parsed fully into fresh maps before anything
    /// is swapped in, so a failed load leaves the current state
    /// untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;

        let mut lines = raw.lines();
        let next_index: usize = lines
            .next()
            .and_then(|line| line.trim().parse().ok())
            .ok_or_else(|| {
                ModelError::Format(format!("'{}': missing index counter", path.display()))
            })?;

        let mut token_to_index = HashMap::new();
        let mut index_to_token = HashMap::new();

        for line in lines {
            // A trailing newline produces one empty line; anything
            // else without a TAB is a corrupt entry.
            if line.is_empty() {
                continue;
            }
            let Some((token, index)) = line.split_once('\t') else {
                return Err(ModelError::Format(format!(
                    "'{}': malformed entry '{}'",
                    path.display(),
                    line
                )));
            };
            let index: usize = index.trim().parse().map_err(|_| {
                ModelError::Format(format!("'{}': bad index in line '{}'", path.display(), line))
            })?;
            token_to_index.insert(token.to_string(), index);
            index_to_token.insert(index, token.to_string());
        }

        self.token_to_index = token_to_index;
        self.index_to_token = index_to_token;
        self.next_index = next_index;

        tracing::debug!("Loaded vocabulary ({} tokens) from '{}'", self.size(), path.display());
        Ok(())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_tokens_present_from_start() {
        let vocab = Vocabulary::new();
        assert_eq!(vocab.size(), 4);
        assert_eq!(vocab.index_of("<PAD>"), PAD_TOKEN);
        assert_eq!(vocab.index_of("<SOS>"), SOS_TOKEN);
        assert_eq!(vocab.index_of("<EOS>"), EOS_TOKEN);
        assert_eq!(vocab.index_of("<UNK>"), UNK_TOKEN);
    }

    #[test]
    fn test_add_token_is_idempotent() {
        let mut vocab = Vocabulary::new();
        let first = vocab.add_token("select");
        assert_eq!(vocab.size(), 5);
        let second = vocab.add_token("select");
        assert_eq!(first, second);
        assert_eq!(vocab.size(), 5);
    }

    #[test]
    fn test_add_corpus_text_counts_distinct_tokens() {
        // "show" and "all" are shared between the two sentences,
        // so only 4 distinct words are added: 4 + 4 = 8.
        let mut vocab = Vocabulary::new();
        vocab.add_corpus_text("Show all users");
        vocab.add_corpus_text("Show all products");
        assert_eq!(vocab.size(), 8);
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            Vocabulary::tokenize("Show ALL users"),
            vec!["show", "all", "users"]
        );
    }

    #[test]
    fn test_tokenize_emits_sql_punctuation() {
        assert_eq!(
            Vocabulary::tokenize("WHERE age=30 AND (x<y);"),
            vec!["where", "age", "=", "30", "and", "(", "x", "<", "y", ")", ";"]
        );
    }

    #[test]
    fn test_tokenize_keeps_underscores() {
        assert_eq!(
            Vocabulary::tokenize("user_id, order_total"),
            vec!["user_id", ",", "order_total"]
        );
    }

    #[test]
    fn test_tokenize_drops_unlisted_punctuation() {
        // '*' and '.' are separators only — they flush the
        // pending token but emit nothing themselves.
        assert_eq!(
            Vocabulary::tokenize("SELECT * FROM a.b"),
            vec!["select", "from", "a", "b"]
        );
    }

    #[test]
    fn test_encode_wraps_with_sos_eos() {
        let mut vocab = Vocabulary::new();
        vocab.add_corpus_text("show all users");
        let encoded = vocab.encode("show all users");
        assert_eq!(
            encoded,
            vec![
                SOS_TOKEN,
                vocab.index_of("show"),
                vocab.index_of("all"),
                vocab.index_of("users"),
                EOS_TOKEN
            ]
        );
    }

    #[test]
    fn test_encode_maps_unknown_to_unk() {
        let vocab = Vocabulary::new();
        assert_eq!(vocab.encode("mystery"), vec![SOS_TOKEN, UNK_TOKEN, EOS_TOKEN]);
    }

    #[test]
    fn test_decode_strips_control_and_spaces_words() {
        let mut vocab = Vocabulary::new();
        vocab.add_corpus_text("select name from users");
        let encoded = vocab.encode("select name from users");
        assert_eq!(vocab.decode(&encoded), "select name from users");
    }

    #[test]
    fn test_decode_attaches_punctuation_to_previous_token() {
        let mut vocab = Vocabulary::new();
        vocab.add_corpus_text("where id = 5 ;");
        let encoded = vocab.encode("where id = 5 ;");
        assert_eq!(vocab.decode(&encoded), "where id= 5;");
    }

    #[test]
    fn test_decode_of_encode_reproduces_token_sequence() {
        let mut vocab = Vocabulary::new();
        vocab.add_corpus_text("Show ALL users, products");
        let decoded = vocab.decode(&vocab.encode("Show ALL users, products"));
        assert_eq!(Vocabulary::tokenize(&decoded), Vocabulary::tokenize("show all users, products"));
    }

    #[test]
    fn test_save_then_load_preserves_indices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.txt");

        let mut original = Vocabulary::new();
        original.add_corpus_text("select name from users where id = 5");
        original.save(&path).unwrap();

        let mut restored = Vocabulary::new();
        restored.load(&path).unwrap();

        assert_eq!(restored.size(), original.size());
        for token in ["select", "name", "from", "users", "where", "id", "=", "5"] {
            assert_eq!(restored.index_of(token), original.index_of(token));
        }
    }

    #[test]
    fn test_load_rejects_entry_without_tab() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        fs::write(&path, "6\n<PAD>\t0\n<SOS>\t1\ntruncated-entry\n").unwrap();

        let mut vocab = Vocabulary::new();
        vocab.add_token("select");

        let err = vocab.load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Format(_)));
        // The corrupt file must not have replaced anything.
        assert_eq!(vocab.size(), 5);
        assert_eq!(vocab.index_of("select"), 4);
    }

    #[test]
    fn test_load_failure_leaves_state_unchanged() {
        let mut vocab = Vocabulary::new();
        vocab.add_token("select");

        let err = vocab.load("no/such/vocab.txt").unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
        assert_eq!(vocab.size(), 5);
        assert_eq!(vocab.index_of("select"), 4);
    }
}
