//! Pure per-sentence decision tree.
//!
//! Scoring and inference live elsewhere; this module maps already-computed
//! layer scores to a verdict so the decision logic is testable without
//! models or indexes.

use super::thresholds::Thresholds;
use super::types::{DetectionLayer, MatchType};

/// Outcome of the decision tree for one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub match_type: MatchType,
    /// Layer whose evidence decided the verdict; `None` for originals.
    pub deciding_layer: Option<DetectionLayer>,
}

impl Classification {
    fn original() -> Self {
        Self {
            match_type: MatchType::Original,
            deciding_layer: None,
        }
    }

    fn flagged(match_type: MatchType, layer: DetectionLayer) -> Self {
        Self {
            match_type,
            deciding_layer: Some(layer),
        }
    }
}

/// Applies the cascade decision tree to one sentence's scores.
///
/// Rules are evaluated in order; the first that fires wins:
///
/// 1. lexical >= `lexical_direct` and semantic >= `direct`: direct match,
///    both layers agree.
/// 2. semantic >= `direct`: direct match on semantic evidence alone.
/// 3. lexical >= `lexical_direct`: direct match on lexical evidence alone.
/// 4. semantic >= `paraphrase`: paraphrased.
/// 5. lexical >= `lexical_match`: paraphrased on lexical overlap alone.
/// 6. semantic in `[ambiguous_low, paraphrase)` and the classifier
///    produced a probability >= `classifier`: AI-paraphrased. A missing
///    probability (layer unavailable, inference error, or band not
///    entered) skips this rule.
/// 7. otherwise: original.
///
/// The classifier is the escalation of last resort: it can only flag a
/// sentence none of the cheaper rules claimed. Callers that skipped a
/// layer pass `0.0` (or `None`) for it, which can never fire a rule.
pub fn classify(
    lexical_score: f32,
    semantic_score: f32,
    classifier_probability: Option<f32>,
    thresholds: &Thresholds,
) -> Classification {
    let lexical_direct = lexical_score >= thresholds.lexical_direct;
    let semantic_direct = semantic_score >= thresholds.direct;

    if lexical_direct && semantic_direct {
        return Classification::flagged(MatchType::DirectMatch, DetectionLayer::LexicalSemantic);
    }
    if semantic_direct {
        return Classification::flagged(MatchType::DirectMatch, DetectionLayer::Semantic);
    }
    if lexical_direct {
        return Classification::flagged(MatchType::DirectMatch, DetectionLayer::Lexical);
    }

    if semantic_score >= thresholds.paraphrase {
        return Classification::flagged(MatchType::Paraphrased, DetectionLayer::Semantic);
    }

    if lexical_score >= thresholds.lexical_match {
        return Classification::flagged(MatchType::Paraphrased, DetectionLayer::Lexical);
    }

    if thresholds.is_ambiguous(semantic_score) {
        if let Some(probability) = classifier_probability {
            if probability >= thresholds.classifier {
                return Classification::flagged(
                    MatchType::AiParaphrased,
                    DetectionLayer::Classifier,
                );
            }
        }
    }

    Classification::original()
}
