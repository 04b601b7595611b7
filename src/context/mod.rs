//! Shared read-only service state.
//!
//! All model and artifact loading happens here, once, at startup. The
//! resulting [`ServiceContext`] is wrapped in an `Arc` and shared across
//! request handlers; nothing in it mutates after initialization.

mod error;


pub use error::ContextError;

use tracing::{info, warn};

use crate::classifier::{ClassifierConfig, PairwiseClassifier};
use crate::config::Config;
use crate::corpus::{self, CorpusEntry};
use crate::embedding::{EncoderConfig, SentenceEncoder};
use crate::lexical::LexicalIndex;
use crate::semindex::SemanticIndex;

/// Which cascade layers can answer queries in this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct LayerAvailability {
    pub lexical: bool,
    pub semantic: bool,
    pub classifier: bool,
}

/// Immutable state shared by every analysis request.
#[derive(Debug)]
pub struct ServiceContext {
    pub encoder: SentenceEncoder,
    pub lexical: Option<LexicalIndex>,
    pub semantic: Option<SemanticIndex>,
    pub corpus: Vec<CorpusEntry>,
    pub classifier: PairwiseClassifier,
    pub availability: LayerAvailability,
}

impl ServiceContext {
    /// Loads every configured artifact and model.
    ///
    /// A path that is configured but does not exist disables its layer
    /// with a warning; an artifact that exists but cannot be loaded is a
    /// hard error so misconfiguration surfaces at startup rather than as
    /// silently degraded verdicts.
    pub fn initialize(config: &Config) -> Result<Self, ContextError> {
        let corpus = match &config.corpus_path {
            Some(path) if path.is_file() => corpus::load_metadata(path)?,
            Some(path) => {
                warn!(path = %path.display(), "Corpus metadata not found, Layers 1 and 2 disabled");
                Vec::new()
            }
            None => {
                info!("No corpus configured, Layers 1 and 2 disabled");
                Vec::new()
            }
        };

        let lexical = if corpus.is_empty() {
            None
        } else {
            let documents = corpus::group_by_source(&corpus);
            let index = LexicalIndex::build(&documents);
            if index.is_none() {
                warn!("Corpus produced no lexical terms, Layer 1 disabled");
            }
            index
        };

        let (encoder, encoder_ready) = Self::load_encoder(config)?;
        let semantic = if encoder_ready {
            Self::load_semantic_index(config, &corpus, &encoder)?
        } else {
            None
        };
        let classifier = Self::load_classifier(config)?;

        let availability = LayerAvailability {
            lexical: lexical.is_some(),
            semantic: semantic.is_some(),
            classifier: classifier.is_model_loaded(),
        };
        info!(?availability, "Service context initialized");

        Ok(Self {
            encoder,
            lexical,
            semantic,
            corpus,
            classifier,
            availability,
        })
    }

    /// Returns the encoder plus whether it can serve Layer 2. An absent
    /// model directory leaves an inert stub in place so the context always
    /// has an encoder.
    fn load_encoder(config: &Config) -> Result<(SentenceEncoder, bool), ContextError> {
        if config.encoder_stub {
            return Ok((SentenceEncoder::load(EncoderConfig::stub())?, true));
        }

        match &config.encoder_path {
            Some(dir) if dir.is_dir() => {
                Ok((SentenceEncoder::load(EncoderConfig::new(dir.clone()))?, true))
            }
            Some(dir) => {
                warn!(path = %dir.display(), "Encoder model not found, Layer 2 disabled");
                Ok((SentenceEncoder::stub(), false))
            }
            None => {
                info!("No encoder configured, Layer 2 disabled");
                Ok((SentenceEncoder::stub(), false))
            }
        }
    }

    /// Layer 2 needs the index artifact, the corpus rows it refers to,
    /// and a working encoder; anything missing disables the layer.
    fn load_semantic_index(
        config: &Config,
        corpus: &[CorpusEntry],
        encoder: &SentenceEncoder,
    ) -> Result<Option<SemanticIndex>, ContextError> {
        let Some(path) = &config.index_path else {
            info!("No semantic index configured, Layer 2 disabled");
            return Ok(None);
        };
        if !path.is_file() {
            warn!(path = %path.display(), "Semantic index not found, Layer 2 disabled");
            return Ok(None);
        }

        let index = SemanticIndex::load(path)?;
        if index.len() != corpus.len() {
            warn!(
                index_rows = index.len(),
                corpus_sentences = corpus.len(),
                path = %path.display(),
                "Semantic index and corpus metadata disagree, Layer 2 disabled"
            );
            return Ok(None);
        }
        if index.dim() != encoder.embedding_dim() {
            warn!(
                index_dim = index.dim(),
                encoder_dim = encoder.embedding_dim(),
                path = %path.display(),
                "Semantic index dimension does not match encoder, Layer 2 disabled"
            );
            return Ok(None);
        }

        info!(
            path = %path.display(),
            rows = index.len(),
            dim = index.dim(),
            "Semantic index loaded"
        );
        Ok(Some(index))
    }

    fn load_classifier(config: &Config) -> Result<PairwiseClassifier, ContextError> {
        let classifier_config = match &config.classifier_path {
            Some(dir) => ClassifierConfig::new(dir.clone()),
            None => ClassifierConfig::disabled(),
        };
        Ok(PairwiseClassifier::load(classifier_config)?)
    }

    /// Context for tests: caller supplies every component directly.
    #[cfg(any(test, feature = "mock"))]
    pub fn from_parts(
        encoder: SentenceEncoder,
        lexical: Option<LexicalIndex>,
        semantic: Option<SemanticIndex>,
        corpus: Vec<CorpusEntry>,
        classifier: PairwiseClassifier,
    ) -> Self {
        let availability = LayerAvailability {
            lexical: lexical.is_some(),
            semantic: semantic.is_some(),
            classifier: classifier.is_model_loaded(),
        };
        Self {
            encoder,
            lexical,
            semantic,
            corpus,
            classifier,
            availability,
        }
    }
}
