use super::*;

fn corpus() -> Vec<(String, String)> {
    vec![
        (
            "biology.txt".to_string(),
            "The mitochondria is the powerhouse of the cell. Cells divide through a process \
             called mitosis. Proteins are assembled by ribosomes."
                .to_string(),
        ),
        (
            "astronomy.txt".to_string(),
            "Jupiter is the largest planet in the solar system. Neutron stars spin hundreds \
             of times per second."
                .to_string(),
        ),
    ]
}

#[test]
fn test_build_empty_corpus_is_not_ready() {
    assert!(LexicalIndex::build(&[]).is_none());
}

#[test]
fn test_build_stop_words_only_is_not_ready() {
    let documents = vec![("noise.txt".to_string(), "the is of and or".to_string())];
    assert!(LexicalIndex::build(&documents).is_none());
}

#[test]
fn test_verbatim_sentence_scores_high() {
    let index = LexicalIndex::build(&corpus()).unwrap();

    let hit = index.score("The mitochondria is the powerhouse of the cell.");

    // One verbatim sentence out of a three-sentence document still shares
    // only a third of the row's terms, so expect a clear but partial score.
    assert!(hit.score > 0.35, "verbatim copy scored {}", hit.score);
    assert_eq!(hit.source_id, "biology.txt");
}

#[test]
fn test_unrelated_sentence_scores_low() {
    let index = LexicalIndex::build(&corpus()).unwrap();

    let hit = index.score("Quarterly revenue grew across every region.");

    assert!(hit.score < 0.2, "unrelated query scored {}", hit.score);
}

#[test]
fn test_best_source_attribution() {
    let index = LexicalIndex::build(&corpus()).unwrap();

    let hit = index.score("Jupiter is the largest planet.");

    assert_eq!(hit.source_id, "astronomy.txt");
    assert!(hit.score > 0.0);
}

#[test]
fn test_no_shared_vocabulary_returns_zero() {
    let index = LexicalIndex::build(&corpus()).unwrap();

    let hit = index.score("zzz qqq xxx");

    assert_eq!(hit.score, 0.0);
    assert!(hit.source_id.is_empty());
}

#[test]
fn test_score_bounds() {
    let index = LexicalIndex::build(&corpus()).unwrap();

    for query in [
        "The mitochondria is the powerhouse of the cell.",
        "Neutron stars spin hundreds of times per second.",
        "Something entirely different about cooking pasta.",
    ] {
        let hit = index.score(query);
        assert!((0.0..=1.0 + 1e-5).contains(&hit.score));
    }
}

#[test]
fn test_len_reports_document_count() {
    let index = LexicalIndex::build(&corpus()).unwrap();
    assert_eq!(index.len(), 2);
    assert!(!index.is_empty());
}
