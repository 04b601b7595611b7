//! Sentence encoder for Layer 2 semantic search.
//!
//! The encoder maps text to fixed-length L2-normalized vectors, so inner
//! product equals cosine similarity downstream. A deterministic stub backend
//! stands in when no model files are configured (tests, degraded startup).

/// BERT backend (candle).
pub mod bert;
/// Encoder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;

#[cfg(test)]
mod tests;

pub use config::EncoderConfig;
pub use error::EmbeddingError;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use bert::BertEncoder;
use device::select_device;

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Arc<Tokenizer>,
    },
    Stub,
}

/// Sentence embedding generator (supports stub mode).
pub struct SentenceEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
    // Counts encode_batch invocations; lets tests assert that cached
    // requests never reach the model.
    batch_calls: AtomicU64,
}

impl std::fmt::Debug for SentenceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { .. } => "Model",
                    EncoderBackend::Stub => "Stub",
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .finish()
    }
}

impl SentenceEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Sentence encoder running in STUB mode (deterministic vectors)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
                batch_calls: AtomicU64::new(0),
            });
        }

        let device = select_device()?;
        let model = BertEncoder::load(&config.model_dir, &device)?;

        let tokenizer_path = config.model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to configure truncation: {e}"),
            })?;

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer: Arc::new(tokenizer),
            },
            config,
            batch_calls: AtomicU64::new(0),
        })
    }

    /// Encoder built directly from a stub config.
    pub fn stub() -> Self {
        Self {
            backend: EncoderBackend::Stub,
            config: EncoderConfig::stub(),
            batch_calls: AtomicU64::new(0),
        }
    }

    /// Encodes every sentence of a document in one batched call.
    ///
    /// This is the single embedding-model invocation per analyzed document;
    /// the cascade never encodes sentence by sentence.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::Relaxed);

        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(sentences = texts.len(), "Encoding sentence batch");

        match &self.backend {
            EncoderBackend::Model { model, tokenizer } => texts
                .iter()
                .map(|text| self.encode_with_model(text, model, tokenizer))
                .collect(),
            EncoderBackend::Stub => Ok(texts.iter().map(|text| self.encode_stub(text)).collect()),
        }
    }

    fn encode_with_model(
        &self,
        text: &str,
        model: &BertEncoder,
        tokenizer: &Tokenizer,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let token_ids = encoding.get_ids();
        if token_ids.is_empty() {
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        let mut embedding = model.encode_tokens(token_ids)?;
        embedding.truncate(self.config.embedding_dim);
        normalize(&mut embedding);
        Ok(embedding)
    }

    // Hash-seeded LCG vectors: identical text always produces the identical
    // unit vector, distinct texts are near-orthogonal in expectation.
    fn encode_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(&mut embedding);
        embedding
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Number of `encode_batch` calls made so far.
    pub fn batch_call_count(&self) -> u64 {
        self.batch_calls.load(Ordering::Relaxed)
    }
}

/// In-place L2 normalization (zero vectors are left untouched).
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
