//! The three-layer detection cascade.
//!
//! Layer 1 scores lexical TF-IDF overlap against whole corpus documents,
//! Layer 2 retrieves the nearest corpus sentence by embedding similarity,
//! and Layer 3 runs a pairwise classifier over the ambiguous middle band.
//! [`classify`] holds the decision tree as a pure function; [`Analyzer`]
//! wires the layers, the cache, and report aggregation together.

mod analyzer;
mod classify;
mod error;
mod thresholds;
mod types;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use classify::{classify, Classification};
pub use error::AnalyzeError;
pub use thresholds::Thresholds;
pub use types::{
    round2, AnalysisMode, AnalysisReport, DetectionLayer, MatchCandidate, MatchType, ReportStats,
    SentenceVerdict,
};
