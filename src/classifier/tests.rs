use super::*;

#[test]
fn test_unavailable_predict_errors() {
    let classifier = PairwiseClassifier::unavailable();

    assert!(!classifier.is_model_loaded());
    assert!(matches!(
        classifier.predict("a suspect sentence", "a corpus sentence"),
        Err(ClassifierError::Unavailable)
    ));
}

#[test]
fn test_load_without_model_dir_is_unavailable() {
    let classifier = PairwiseClassifier::load(ClassifierConfig::disabled()).unwrap();
    assert!(!classifier.is_model_loaded());
}

#[test]
fn test_load_missing_directory_is_unavailable_not_fatal() {
    let classifier =
        PairwiseClassifier::load(ClassifierConfig::new("/nonexistent/classifier")).unwrap();
    assert!(!classifier.is_model_loaded());
}

#[test]
fn test_fixed_backend_returns_probability() {
    let classifier = PairwiseClassifier::fixed(0.72);

    assert!(classifier.is_model_loaded());
    let probability = classifier.predict("suspect", "candidate").unwrap();
    assert!((probability - 0.72).abs() < f32::EPSILON);
}

#[test]
fn test_predict_call_counter() {
    let classifier = PairwiseClassifier::fixed(0.5);
    assert_eq!(classifier.predict_call_count(), 0);

    classifier.predict("one", "pair").unwrap();
    classifier.predict("another", "pair").unwrap();

    assert_eq!(classifier.predict_call_count(), 2);
}
