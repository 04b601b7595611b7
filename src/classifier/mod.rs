//! Layer 3: pairwise plagiarism classifier.
//!
//! A fine-tuned BERT over `(suspect sentence, candidate corpus sentence)`
//! pairs, invoked by the cascade only for scores in the ambiguous band. The
//! model artifact is optional: when absent the layer reports unavailable
//! and the cascade proceeds on the remaining evidence.

pub mod config;
mod error;
mod model;

#[cfg(test)]
mod tests;

pub use config::{ClassifierConfig, MAX_SEQ_LEN};
pub use error::ClassifierError;

use std::sync::atomic::{AtomicU64, Ordering};

use candle_core::{IndexOp, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use model::BertPairClassifier;

enum ClassifierBackend {
    Model {
        model: BertPairClassifier,
        tokenizer: Tokenizer,
        device: candle_core::Device,
    },
    Unavailable,
    #[cfg(any(test, feature = "mock"))]
    Fixed(f32),
}

/// Pairwise sentence classifier with graceful degradation.
pub struct PairwiseClassifier {
    backend: ClassifierBackend,
    predict_calls: AtomicU64,
}

impl std::fmt::Debug for PairwiseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairwiseClassifier")
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl PairwiseClassifier {
    /// Loads the classifier; a missing model directory is not fatal.
    ///
    /// `Ok` with an unavailable backend is returned when no directory is
    /// configured or the directory does not exist; a present but broken
    /// artifact is a hard error so misconfiguration surfaces at startup.
    pub fn load(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let Some(model_dir) = config.model_dir else {
            info!("No classifier model configured, Layer 3 disabled");
            return Ok(Self::unavailable());
        };

        if !model_dir.is_dir() {
            warn!(
                model_dir = %model_dir.display(),
                "Classifier model directory not found, Layer 3 disabled"
            );
            return Ok(Self::unavailable());
        }

        let device = select_device().map_err(|e| ClassifierError::ModelLoadFailed {
            reason: e.to_string(),
        })?;

        let model = BertPairClassifier::load(&model_dir, &device)?;

        let mut tokenizer = Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(
            |e| ClassifierError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {e}"),
            },
        )?;
        let max_seq_len = if config.max_seq_len == 0 {
            MAX_SEQ_LEN
        } else {
            config.max_seq_len
        };
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::ModelLoadFailed {
                reason: format!("failed to configure truncation: {e}"),
            })?;

        info!(model_dir = %model_dir.display(), "Pairwise classifier loaded");

        Ok(Self {
            backend: ClassifierBackend::Model {
                model,
                tokenizer,
                device,
            },
            predict_calls: AtomicU64::new(0),
        })
    }

    /// Classifier with no model (Layer 3 disabled).
    pub fn unavailable() -> Self {
        Self {
            backend: ClassifierBackend::Unavailable,
            predict_calls: AtomicU64::new(0),
        }
    }

    /// Classifier returning a fixed probability for every pair.
    #[cfg(any(test, feature = "mock"))]
    pub fn fixed(probability: f32) -> Self {
        Self {
            backend: ClassifierBackend::Fixed(probability),
            predict_calls: AtomicU64::new(0),
        }
    }

    /// Returns `true` if a real or mock model can answer predictions.
    pub fn is_model_loaded(&self) -> bool {
        !matches!(self.backend, ClassifierBackend::Unavailable)
    }

    /// Probability in `[0, 1]` that `suspect` is plagiarized from
    /// `candidate`.
    ///
    /// [`ClassifierError::Unavailable`] when no model is loaded; callers
    /// treat any error as "no additional evidence" for the sentence at
    /// hand, never as a request failure.
    pub fn predict(&self, suspect: &str, candidate: &str) -> Result<f32, ClassifierError> {
        self.predict_calls.fetch_add(1, Ordering::Relaxed);

        match &self.backend {
            ClassifierBackend::Unavailable => Err(ClassifierError::Unavailable),
            #[cfg(any(test, feature = "mock"))]
            ClassifierBackend::Fixed(probability) => Ok(*probability),
            ClassifierBackend::Model {
                model,
                tokenizer,
                device,
            } => {
                debug!(
                    suspect_len = suspect.len(),
                    candidate_len = candidate.len(),
                    "Scoring sentence pair"
                );

                let tokens = tokenizer.encode((suspect, candidate), true).map_err(|e| {
                    ClassifierError::TokenizationFailed {
                        reason: e.to_string(),
                    }
                })?;

                let input_ids = Tensor::new(tokens.get_ids(), device)?.unsqueeze(0)?;
                let type_ids = Tensor::new(tokens.get_type_ids(), device)?.unsqueeze(0)?;
                let attention_mask =
                    Tensor::new(tokens.get_attention_mask(), device)?.unsqueeze(0)?;

                let logits = model.forward(&input_ids, &type_ids, Some(&attention_mask))?;
                let probabilities = candle_nn::ops::softmax(&logits, 1)?;
                // P(class = 1) = plagiarized.
                let probability = probabilities.i((0, 1))?.to_scalar::<f32>()?;

                Ok(probability)
            }
        }
    }

    /// Number of `predict` calls made so far.
    pub fn predict_call_count(&self) -> u64 {
        self.predict_calls.load(Ordering::Relaxed)
    }
}
