use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemanticIndexError {
    #[error("failed to read index artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid index artifact {path}: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("invalid query dimension: expected {expected}, got {actual}")]
    InvalidQueryDimension { expected: usize, actual: usize },

    #[error("embedding dimension mismatch: artifact has {artifact}, vector has {vector}")]
    DimensionMismatch { artifact: usize, vector: usize },
}

pub type SemanticIndexResult<T> = Result<T, SemanticIndexError>;
