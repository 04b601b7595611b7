//! Shared dimension and sizing constants.

/// Default sentence-embedding dimension (MiniLM-class encoders).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Default max tokens fed to the encoder per sentence.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Hard cap on document length before segmentation.
pub const MAX_DOCUMENT_CHARS: usize = 100_000;

/// Sentences shorter than this (after trimming) are discarded.
pub const MIN_SENTENCE_CHARS: usize = 6;

/// Max distinct terms kept by the lexical index vocabulary.
pub const LEXICAL_MAX_FEATURES: usize = 50_000;

/// Characters of the matched corpus sentence shown in report snippets.
pub const SNIPPET_CHARS: usize = 100;
