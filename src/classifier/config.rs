use std::path::PathBuf;

/// Max tokens for a tokenized sentence pair.
pub const MAX_SEQ_LEN: usize = 256;

#[derive(Debug, Clone, Default)]
/// Configuration for [`PairwiseClassifier`](super::PairwiseClassifier).
pub struct ClassifierConfig {
    /// Directory with the fine-tuned model (`config.json`,
    /// `model.safetensors`, `tokenizer.json`). `None` disables Layer 3.
    pub model_dir: Option<PathBuf>,
    /// Max tokens per pair (default [`MAX_SEQ_LEN`]).
    pub max_seq_len: usize,
}

impl ClassifierConfig {
    /// Config pointing at a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            max_seq_len: MAX_SEQ_LEN,
        }
    }

    /// Config with no model: the classifier reports unavailable.
    pub fn disabled() -> Self {
        Self {
            model_dir: None,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}
