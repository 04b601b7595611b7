use thiserror::Error;

/// Startup failures while assembling the service context.
///
/// Only broken artifacts land here: configured-but-absent paths degrade
/// the corresponding layer instead of failing startup.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to load corpus metadata: {0}")]
    Corpus(#[from] crate::corpus::CorpusError),

    #[error("failed to load semantic index: {0}")]
    SemanticIndex(#[from] crate::semindex::SemanticIndexError),

    #[error("failed to load sentence encoder: {0}")]
    Encoder(#[from] crate::embedding::EmbeddingError),

    #[error("failed to load pairwise classifier: {0}")]
    Classifier(#[from] crate::classifier::ClassifierError),
}
