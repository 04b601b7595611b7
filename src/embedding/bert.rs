//! Candle BERT backend for sentence embeddings (mean pooling).

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};

use super::error::EmbeddingError;

/// BERT encoder producing one pooled vector per input sentence.
pub struct BertEncoder {
    model: BertModel,
    device: Device,
}

impl BertEncoder {
    /// Loads a BERT model from a directory with `config.json` and
    /// `model.safetensors`.
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self, EmbeddingError> {
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        for required in [&config_path, &weights_path] {
            if !required.exists() {
                return Err(EmbeddingError::ModelNotFound {
                    path: required.clone(),
                });
            }
        }

        let config_content = std::fs::read_to_string(&config_path)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to parse encoder config.json: {e}"),
            })?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
                .map_err(|e| EmbeddingError::ModelLoadFailed {
                    reason: format!("failed to map encoder weights: {e}"),
                })?
        };

        let model =
            BertModel::load(vb, &config).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load BERT encoder: {e}"),
            })?;

        Ok(Self {
            model,
            device: device.clone(),
        })
    }

    /// Encodes one token sequence into an unnormalized pooled vector.
    ///
    /// Mean pooling over real (unpadded) token positions, the convention
    /// for MiniLM-style sentence encoders.
    pub fn encode_tokens(&self, token_ids: &[u32]) -> Result<Vec<f32>, EmbeddingError> {
        let seq_len = token_ids.len();
        if seq_len == 0 {
            return Err(EmbeddingError::InferenceFailed {
                reason: "empty token sequence".to_string(),
            });
        }

        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        // [1, seq_len, hidden] -> mean over seq_len -> [hidden]
        let hidden = self.model.forward(&input_ids, &token_type_ids, None)?;
        let pooled = (hidden.sum(1)? / seq_len as f64)?;
        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;

        Ok(embedding)
    }
}

impl std::fmt::Debug for BertEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEncoder")
            .field("device", &format!("{:?}", self.device))
            .finish()
    }
}
