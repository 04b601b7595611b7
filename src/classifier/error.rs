use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier artifact not loaded")]
    Unavailable,

    #[error("failed to load classifier: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("classifier inference failed: {reason}")]
    InferenceFailed { reason: String },
}

impl From<candle_core::Error> for ClassifierError {
    fn from(err: candle_core::Error) -> Self {
        ClassifierError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
