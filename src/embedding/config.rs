use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEncoder`](super::SentenceEncoder).
pub struct EncoderConfig {
    /// Directory holding `config.json`, `model.safetensors` and
    /// `tokenizer.json` for a BERT-family sentence encoder.
    pub model_dir: PathBuf,
    /// Output embedding dimension.
    pub embedding_dim: usize,
    /// Max tokens considered per sentence.
    pub max_seq_len: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic vectors).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }
}
