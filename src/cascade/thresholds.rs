//! Decision thresholds for the cascade.

/// Score thresholds applied by [`classify`](super::classify::classify).
///
/// All similarity values live in `[0, 1]`. The defaults match the tuned
/// production values; individual fields can be overridden through
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Semantic similarity at or above which a sentence is a direct match.
    pub direct: f32,
    /// Semantic similarity at or above which a sentence is paraphrased.
    pub paraphrase: f32,
    /// Lexical similarity at or above which a sentence is a direct match.
    pub lexical_direct: f32,
    /// Lexical similarity at or above which a sentence is paraphrased.
    pub lexical_match: f32,
    /// Lower bound of the ambiguous band `[ambiguous_low, paraphrase)`
    /// that routes a sentence to the pairwise classifier.
    pub ambiguous_low: f32,
    /// Classifier probability at or above which an ambiguous sentence is
    /// flagged as AI-paraphrased.
    pub classifier: f32,
    /// Lexical similarity used as the sole direct-match bar in fast mode.
    pub fast_lexical: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            direct: 0.95,
            paraphrase: 0.75,
            lexical_direct: 0.80,
            lexical_match: 0.45,
            ambiguous_low: 0.40,
            classifier: 0.60,
            fast_lexical: 0.85,
        }
    }
}

impl Thresholds {
    /// Thresholds effective for `mode`.
    ///
    /// Fast mode trades recall for latency: only the lexical layer runs,
    /// against the single stricter `fast_lexical` bar (the paraphrase-level
    /// lexical rule is raised to the same bar, so fast mode reports direct
    /// matches or nothing). Deep mode returns the thresholds unchanged.
    pub fn for_mode(&self, mode: super::AnalysisMode) -> Self {
        match mode {
            super::AnalysisMode::Deep => *self,
            super::AnalysisMode::Fast => Self {
                lexical_direct: self.fast_lexical,
                lexical_match: self.fast_lexical,
                ..*self
            },
        }
    }

    /// `true` when `semantic_score` falls in the classifier band.
    #[inline]
    pub fn is_ambiguous(&self, semantic_score: f32) -> bool {
        semantic_score >= self.ambiguous_low && semantic_score < self.paraphrase
    }
}
