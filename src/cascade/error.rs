use thiserror::Error;

/// Errors surfaced to callers of [`Analyzer::analyze`](super::Analyzer::analyze).
///
/// Layer failures never appear here: a layer that cannot answer degrades
/// the cascade for the affected sentences and the analysis still completes.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The submitted document is empty or whitespace-only.
    #[error("no text provided")]
    NoText,
}
