use super::*;

use crate::embedding::normalize;

fn unit(mut v: Vec<f32>) -> Vec<f32> {
    normalize(&mut v);
    v
}

fn basis(dim: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[axis] = 1.0;
    v
}

#[test]
fn test_artifact_roundtrip() {
    let dim = 8;
    let vectors = vec![
        unit(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
        basis(dim, 0),
        basis(dim, 3),
    ];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.vtix");
    write_artifact(&path, &vectors, dim).unwrap();

    let index = SemanticIndex::load(&path).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.dim(), dim);

    let hits = index.search_batch(&[basis(dim, 3)]).unwrap();
    assert_eq!(hits[0].row, 2);
    assert!(hits[0].score > 0.99);
}

#[test]
fn test_load_rejects_bad_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bogus.vtix");
    std::fs::write(&path, b"XXXX0000000000000000").unwrap();

    assert!(matches!(
        SemanticIndex::load(&path),
        Err(SemanticIndexError::InvalidArtifact { .. })
    ));
}

#[test]
fn test_load_rejects_truncated_file() {
    let dim = 4;
    let vectors = vec![basis(dim, 0), basis(dim, 1)];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.vtix");
    write_artifact(&path, &vectors, dim).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

    assert!(matches!(
        SemanticIndex::load(&path),
        Err(SemanticIndexError::InvalidArtifact { .. })
    ));
}

#[test]
fn test_exact_match_scores_near_one() {
    let dim = 16;
    let query = unit((0..dim).map(|i| (i as f32) - 4.0).collect());
    let index = SemanticIndex::from_vectors(&[query.clone()], dim).unwrap();

    let hits = index.search_batch(&[query]).unwrap();

    assert_eq!(hits[0].row, 0);
    assert!(hits[0].score > 0.99, "score was {}", hits[0].score);
}

#[test]
fn test_tie_broken_by_first_row() {
    let dim = 4;
    // Two identical rows: the first one must win.
    let index =
        SemanticIndex::from_vectors(&[basis(dim, 1), basis(dim, 1), basis(dim, 2)], dim).unwrap();

    let hits = index.search_batch(&[basis(dim, 1)]).unwrap();
    assert_eq!(hits[0].row, 0);
}

#[test]
fn test_batch_returns_one_hit_per_query() {
    let dim = 4;
    let index = SemanticIndex::from_vectors(&[basis(dim, 0), basis(dim, 1)], dim).unwrap();

    let queries = vec![basis(dim, 1), basis(dim, 0), basis(dim, 1)];
    let hits = index.search_batch(&queries).unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].row, 1);
    assert_eq!(hits[1].row, 0);
    assert_eq!(hits[2].row, 1);
}

#[test]
fn test_query_dimension_mismatch() {
    let index = SemanticIndex::from_vectors(&[basis(4, 0)], 4).unwrap();

    assert!(matches!(
        index.search_batch(&[vec![1.0, 0.0]]),
        Err(SemanticIndexError::InvalidQueryDimension { .. })
    ));
}

#[test]
fn test_from_vectors_dimension_mismatch() {
    assert!(matches!(
        SemanticIndex::from_vectors(&[vec![1.0, 0.0, 0.0]], 4),
        Err(SemanticIndexError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_empty_batch() {
    let index = SemanticIndex::from_vectors(&[basis(4, 0)], 4).unwrap();
    assert!(index.search_batch(&[]).unwrap().is_empty());
}
