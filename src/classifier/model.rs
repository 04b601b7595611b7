//! Candle BERT sequence-pair classifier (two-logit CLS head).

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

use super::error::ClassifierError;

struct BertPairClassifierImpl {
    bert: BertModel,
    classifier: Linear,
}

impl BertPairClassifierImpl {
    fn load(vb: VarBuilder, config: &Config) -> candle_core::Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        // Two-class head: logit 1 is "plagiarized".
        let classifier = candle_nn::linear(config.hidden_size, 2, vb.pp("classifier"))?;

        Ok(Self { bert, classifier })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> candle_core::Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.classifier.forward(&cls_token)
    }
}

/// Fine-tuned BERT over `(suspect, candidate)` sentence pairs.
#[derive(Clone)]
pub struct BertPairClassifier(std::sync::Arc<BertPairClassifierImpl>);

impl BertPairClassifier {
    /// Loads from a directory with `config.json` and `model.safetensors`.
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self, ClassifierError> {
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(&config_path).map_err(|e| {
            ClassifierError::ModelLoadFailed {
                reason: format!("failed to read {}: {e}", config_path.display()),
            }
        })?;
        let config: Config = serde_json::from_str(&config_content).map_err(|e| {
            ClassifierError::ModelLoadFailed {
                reason: format!("failed to parse classifier config: {e}"),
            }
        })?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device).map_err(
                |e| ClassifierError::ModelLoadFailed {
                    reason: format!("failed to map classifier weights: {e}"),
                },
            )?
        };

        let model = BertPairClassifierImpl::load(vb, &config).map_err(|e| {
            ClassifierError::ModelLoadFailed {
                reason: format!("failed to load BERT classifier: {e}"),
            }
        })?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Raw two-logit output for a tokenized pair, shape `[1, 2]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> candle_core::Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}
