//! Report data model: one verdict per sentence, aggregated per document.

use serde::{Deserialize, Serialize};

/// How an analysis request is processed.
///
/// `Fast` runs the lexical layer only with a stricter direct threshold;
/// `Deep` runs the full three-layer cascade. The mode is part of the cache
/// key, so the two never share results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Fast,
    #[default]
    Deep,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Fast => "fast",
            AnalysisMode::Deep => "deep",
        }
    }

    /// Parses the wire/file representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fast" => Some(AnalysisMode::Fast),
            "deep" => Some(AnalysisMode::Deep),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict category for one sentence. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// No layer produced sufficient evidence.
    Original,
    /// Near-verbatim copy (lexical or semantic near-identity).
    #[serde(rename = "Direct Match")]
    DirectMatch,
    /// Reworded but similar (semantic or lexical evidence below the
    /// direct bar).
    Paraphrased,
    /// Caught only by the pairwise classifier in the ambiguous band.
    #[serde(rename = "AI-Paraphrased")]
    AiParaphrased,
}

impl MatchType {
    /// `true` for every category except `Original`.
    #[inline]
    pub fn is_flagged(&self) -> bool {
        !matches!(self, MatchType::Original)
    }
}

/// The layer (or layer pair) whose evidence decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionLayer {
    #[serde(rename = "layer1")]
    Lexical,
    #[serde(rename = "layer2")]
    Semantic,
    #[serde(rename = "layer1+2")]
    LexicalSemantic,
    #[serde(rename = "layer3")]
    Classifier,
}

impl DetectionLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionLayer::Lexical => "layer1",
            DetectionLayer::Semantic => "layer2",
            DetectionLayer::LexicalSemantic => "layer1+2",
            DetectionLayer::Classifier => "layer3",
        }
    }
}

impl std::fmt::Display for DetectionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best corpus candidate recorded for a flagged sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Source document the evidence points at.
    pub source_id: String,
    /// Human-readable description of the match.
    pub snippet: String,
    /// The deciding layer's score (similarity or probability, `[0, 1]`).
    pub score: f32,
    /// Layer that produced this candidate.
    pub layer: DetectionLayer,
}

/// One sentence's verdict. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceVerdict {
    /// The submitted sentence.
    pub text: String,
    /// `true` iff `match_type` is not `Original`.
    pub flagged: bool,
    pub match_type: MatchType,
    /// Layer whose evidence decided the verdict (`None` for originals).
    pub deciding_layer: Option<DetectionLayer>,
    /// Best-matching corpus candidate (`None` for originals).
    pub best_match: Option<MatchCandidate>,
}

/// Per-category counts and percentages for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_sentences: usize,
    pub direct_count: usize,
    pub paraphrased_count: usize,
    pub ai_paraphrased_count: usize,
    pub original_count: usize,
    pub direct_percent: f64,
    pub paraphrased_percent: f64,
    pub ai_paraphrased_percent: f64,
    pub original_percent: f64,
}

impl ReportStats {
    /// Stats for a document with at least one sentence.
    pub fn from_counts(
        direct_count: usize,
        paraphrased_count: usize,
        ai_paraphrased_count: usize,
        original_count: usize,
    ) -> Self {
        let total_sentences =
            direct_count + paraphrased_count + ai_paraphrased_count + original_count;
        let percent = |count: usize| {
            if total_sentences == 0 {
                0.0
            } else {
                round2(count as f64 / total_sentences as f64 * 100.0)
            }
        };

        Self {
            total_sentences,
            direct_count,
            paraphrased_count,
            ai_paraphrased_count,
            original_count,
            direct_percent: percent(direct_count),
            paraphrased_percent: percent(paraphrased_count),
            ai_paraphrased_percent: percent(ai_paraphrased_count),
            original_percent: percent(original_count),
        }
    }

    /// Canonical stats for a document with no usable sentences.
    pub fn empty() -> Self {
        Self {
            total_sentences: 0,
            direct_count: 0,
            paraphrased_count: 0,
            ai_paraphrased_count: 0,
            original_count: 0,
            direct_percent: 0.0,
            paraphrased_percent: 0.0,
            ai_paraphrased_percent: 0.0,
            original_percent: 100.0,
        }
    }
}

/// Completed document analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// `100 * flagged / total`, rounded to two decimals; `0` for empty
    /// documents.
    pub overall_score: f64,
    /// One verdict per submitted sentence, in document order.
    pub sentence_verdicts: Vec<SentenceVerdict>,
    pub stats: ReportStats,
    /// The analyzed text as submitted.
    pub full_text: String,
}

impl AnalysisReport {
    /// Canonical report for input that segmented to zero sentences.
    pub fn empty(full_text: &str) -> Self {
        Self {
            overall_score: 0.0,
            sentence_verdicts: Vec::new(),
            stats: ReportStats::empty(),
            full_text: full_text.to_string(),
        }
    }

    /// Number of flagged sentences.
    pub fn flagged_count(&self) -> usize {
        self.sentence_verdicts.iter().filter(|v| v.flagged).count()
    }
}

/// Rounds to two decimal places (report convention).
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
