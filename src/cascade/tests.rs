use super::classify::classify;
use super::thresholds::Thresholds;
use super::types::{
    round2, AnalysisMode, AnalysisReport, DetectionLayer, MatchType, ReportStats,
};

fn defaults() -> Thresholds {
    Thresholds::default()
}

#[test]
fn test_verbatim_sentence_is_direct_match_on_both_layers() {
    let c = classify(0.92, 0.99, None, &defaults());
    assert_eq!(c.match_type, MatchType::DirectMatch);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::LexicalSemantic));
}

#[test]
fn test_semantic_identity_alone_is_direct_match() {
    let c = classify(0.10, 0.96, None, &defaults());
    assert_eq!(c.match_type, MatchType::DirectMatch);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Semantic));
}

#[test]
fn test_lexical_identity_alone_is_direct_match() {
    let c = classify(0.85, 0.30, None, &defaults());
    assert_eq!(c.match_type, MatchType::DirectMatch);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Lexical));
}

#[test]
fn test_high_semantic_similarity_is_paraphrase() {
    let c = classify(0.20, 0.80, None, &defaults());
    assert_eq!(c.match_type, MatchType::Paraphrased);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Semantic));
}

#[test]
fn test_ambiguous_band_with_confident_classifier_is_ai_paraphrase() {
    let c = classify(0.20, 0.55, Some(0.90), &defaults());
    assert_eq!(c.match_type, MatchType::AiParaphrased);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Classifier));
}

#[test]
fn test_ambiguous_band_with_unconfident_classifier_falls_through() {
    let c = classify(0.10, 0.55, Some(0.30), &defaults());
    assert_eq!(c.match_type, MatchType::Original);
    assert_eq!(c.deciding_layer, None);
}

#[test]
fn test_lexical_match_flags_paraphrase_regardless_of_semantic_score() {
    // The lexical-overlap rule needs no semantic corroboration.
    let c = classify(0.50, 0.20, None, &defaults());
    assert_eq!(c.match_type, MatchType::Paraphrased);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Lexical));

    let c = classify(0.50, 0.0, None, &defaults());
    assert_eq!(c.match_type, MatchType::Paraphrased);
}

#[test]
fn test_lexical_match_outranks_the_classifier_band() {
    // A sentence already claimed by lexical overlap never escalates to
    // the classifier, even inside the ambiguous band with a confident
    // probability.
    let c = classify(0.50, 0.55, Some(0.70), &defaults());
    assert_eq!(c.match_type, MatchType::Paraphrased);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Lexical));
}

#[test]
fn test_low_scores_are_original() {
    let c = classify(0.10, 0.20, None, &defaults());
    assert_eq!(c.match_type, MatchType::Original);
    assert_eq!(c.deciding_layer, None);
    assert!(!c.match_type.is_flagged());
}

#[test]
fn test_classifier_probability_outside_band_is_ignored() {
    // Even a confident probability must not flag when the semantic score
    // sits below the band.
    let c = classify(0.10, 0.30, Some(0.99), &defaults());
    assert_eq!(c.match_type, MatchType::Original);
}

#[test]
fn test_band_edges() {
    let t = defaults();

    // Exactly at paraphrase: rule 4 fires, not the band.
    let c = classify(0.0, t.paraphrase, Some(0.99), &t);
    assert_eq!(c.match_type, MatchType::Paraphrased);
    assert_eq!(c.deciding_layer, Some(DetectionLayer::Semantic));

    // Exactly at ambiguous_low: inside the band.
    let c = classify(0.0, t.ambiguous_low, Some(0.99), &t);
    assert_eq!(c.match_type, MatchType::AiParaphrased);

    // Just below ambiguous_low: outside.
    let c = classify(0.0, t.ambiguous_low - 0.01, Some(0.99), &t);
    assert_eq!(c.match_type, MatchType::Original);
}

#[test]
fn test_verdicts_monotone_in_semantic_score() {
    // Raising the semantic score never downgrades a verdict.
    let t = defaults();
    let rank = |mt: MatchType| match mt {
        MatchType::Original => 0,
        MatchType::AiParaphrased => 1,
        MatchType::Paraphrased => 2,
        MatchType::DirectMatch => 3,
    };

    let mut previous = 0;
    for step in 0..=100 {
        let semantic = step as f32 / 100.0;
        let c = classify(0.0, semantic, None, &t);
        let current = rank(c.match_type);
        assert!(
            current >= previous,
            "verdict downgraded at semantic={semantic}"
        );
        previous = current;
    }
}

#[test]
fn test_fast_mode_raises_lexical_bar() {
    let t = defaults().for_mode(AnalysisMode::Fast);
    assert_eq!(t.lexical_direct, defaults().fast_lexical);
    // Both lexical rules collapse onto the single fast bar.
    assert_eq!(t.lexical_match, defaults().fast_lexical);

    // 0.80 flags in deep mode but not in fast mode.
    assert_eq!(
        classify(0.80, 0.0, None, &defaults()).match_type,
        MatchType::DirectMatch
    );
    assert_eq!(classify(0.80, 0.0, None, &t).match_type, MatchType::Original);
    assert_eq!(
        classify(0.90, 0.0, None, &t).match_type,
        MatchType::DirectMatch
    );
}

#[test]
fn test_deep_mode_thresholds_unchanged() {
    assert_eq!(defaults().for_mode(AnalysisMode::Deep), defaults());
}

#[test]
fn test_stats_counts_and_percentages() {
    let stats = ReportStats::from_counts(1, 2, 1, 4);

    assert_eq!(stats.total_sentences, 8);
    assert_eq!(stats.direct_percent, 12.5);
    assert_eq!(stats.paraphrased_percent, 25.0);
    assert_eq!(stats.ai_paraphrased_percent, 12.5);
    assert_eq!(stats.original_percent, 50.0);
}

#[test]
fn test_empty_stats_are_fully_original() {
    let stats = ReportStats::empty();
    assert_eq!(stats.total_sentences, 0);
    assert_eq!(stats.original_percent, 100.0);
    assert_eq!(stats.direct_percent, 0.0);
}

#[test]
fn test_empty_report_shape() {
    let report = AnalysisReport::empty("???");
    assert_eq!(report.overall_score, 0.0);
    assert!(report.sentence_verdicts.is_empty());
    assert_eq!(report.full_text, "???");
    assert_eq!(report.flagged_count(), 0);
}

#[test]
fn test_round2() {
    assert_eq!(round2(33.333333), 33.33);
    assert_eq!(round2(66.666666), 66.67);
    assert_eq!(round2(100.0), 100.0);
}

#[test]
fn test_match_type_wire_names() {
    assert_eq!(
        serde_json::to_string(&MatchType::DirectMatch).unwrap(),
        "\"Direct Match\""
    );
    assert_eq!(
        serde_json::to_string(&MatchType::AiParaphrased).unwrap(),
        "\"AI-Paraphrased\""
    );
    assert_eq!(
        serde_json::to_string(&DetectionLayer::LexicalSemantic).unwrap(),
        "\"layer1+2\""
    );
}

#[test]
fn test_analysis_mode_parse() {
    assert_eq!(AnalysisMode::parse("fast"), Some(AnalysisMode::Fast));
    assert_eq!(AnalysisMode::parse("deep"), Some(AnalysisMode::Deep));
    assert_eq!(AnalysisMode::parse("turbo"), None);
    assert_eq!(AnalysisMode::default(), AnalysisMode::Deep);
}
