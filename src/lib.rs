//! Sentence-level plagiarism and AI-paraphrase detection.
//!
//! Documents are segmented into sentences and each sentence is pushed
//! through a three-layer cascade: TF-IDF lexical overlap, embedding
//! nearest-neighbour search over a precomputed corpus index, and a
//! pairwise BERT classifier for the ambiguous middle band. Verdicts are
//! aggregated into a per-document report and cached by content hash.
//!
//! The [`gateway`] module exposes the cascade over HTTP; [`cascade`] holds
//! the decision logic and the [`Analyzer`] entry point.

pub mod cache;
pub mod cascade;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod context;
pub mod corpus;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod lexical;
pub mod segment;
pub mod semindex;

pub use cache::ResultCache;
pub use cascade::{AnalysisMode, AnalysisReport, Analyzer, Thresholds};
pub use config::Config;
pub use context::ServiceContext;
