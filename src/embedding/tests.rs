use super::*;

#[test]
fn test_stub_embedding_determinism() {
    let encoder = SentenceEncoder::stub();

    let a = encoder.encode_batch(&["The same sentence."]).unwrap();
    let b = encoder.encode_batch(&["The same sentence."]).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_stub_embedding_dimension_and_norm() {
    let encoder = SentenceEncoder::stub();

    let vectors = encoder
        .encode_batch(&["First sentence.", "Second sentence."])
        .unwrap();

    assert_eq!(vectors.len(), 2);
    for vector in &vectors {
        assert_eq!(vector.len(), encoder.embedding_dim());
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
    }
}

#[test]
fn test_distinct_texts_produce_distinct_vectors() {
    let encoder = SentenceEncoder::stub();

    let vectors = encoder
        .encode_batch(&["One thing entirely.", "Another thing entirely."])
        .unwrap();

    assert_ne!(vectors[0], vectors[1]);
}

#[test]
fn test_empty_batch() {
    let encoder = SentenceEncoder::stub();
    assert!(encoder.encode_batch(&[]).unwrap().is_empty());
}

#[test]
fn test_batch_call_counter() {
    let encoder = SentenceEncoder::stub();
    assert_eq!(encoder.batch_call_count(), 0);

    encoder.encode_batch(&["A sentence to count."]).unwrap();
    encoder.encode_batch(&[]).unwrap();

    assert_eq!(encoder.batch_call_count(), 2);
}

#[test]
fn test_config_validate_rejects_missing_dir() {
    let config = EncoderConfig::new("/nonexistent/encoder/dir");
    assert!(matches!(
        config.validate(),
        Err(EmbeddingError::ModelNotFound { .. })
    ));
}

#[test]
fn test_config_validate_requires_path_without_stub() {
    let config = EncoderConfig::default();
    assert!(matches!(
        config.validate(),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_normalize_zero_vector_untouched() {
    let mut vector = vec![0.0f32; 8];
    normalize(&mut vector);
    assert!(vector.iter().all(|&x| x == 0.0));
}
