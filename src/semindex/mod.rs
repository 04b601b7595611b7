//! Layer 2: exact nearest-neighbor search over corpus sentence embeddings.
//!
//! Corpus vectors are L2-normalized and stored as little-endian f16 rows in
//! a flat binary artifact produced offline; at startup the artifact is
//! memory-mapped and searched exactly (no approximation). Since all vectors
//! are normalized, inner product equals cosine similarity.
//!
//! The whole document is searched in one [`SemanticIndex::search_batch`]
//! call; this is the dominant cost path and is never invoked per sentence.

mod error;

#[cfg(test)]
mod tests;

pub use error::{SemanticIndexError, SemanticIndexResult};

use std::fs::File;
use std::io::Write;
use std::path::Path;

use half::f16;
use memmap2::Mmap;
use tracing::info;

/// Artifact magic bytes ("VTIX").
const MAGIC: [u8; 4] = *b"VTIX";
/// Artifact format version.
const VERSION: u32 = 1;
/// Header: magic + version + dim + rows, 4 bytes each.
const HEADER_BYTES: usize = 16;

/// Top-1 search hit for one query vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Cosine similarity in `[-1, 1]` (normalized vectors).
    pub score: f32,
    /// Row index into the corpus metadata.
    pub row: usize,
}

enum IndexData {
    Mapped(Mmap),
    Owned(Vec<f16>),
}

/// Read-only exact-search index over f16 corpus embeddings.
pub struct SemanticIndex {
    data: IndexData,
    dim: usize,
    rows: usize,
}

impl std::fmt::Debug for SemanticIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticIndex")
            .field("rows", &self.rows)
            .field("dim", &self.dim)
            .finish()
    }
}

impl SemanticIndex {
    /// Memory-maps an index artifact produced by [`write_artifact`].
    pub fn load(path: &Path) -> SemanticIndexResult<Self> {
        let file = File::open(path).map_err(|source| SemanticIndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Read-only mapping of an immutable artifact.
        let mmap = unsafe {
            Mmap::map(&file).map_err(|source| SemanticIndexError::Io {
                path: path.to_path_buf(),
                source,
            })?
        };

        let (dim, rows) = validate_header(&mmap).map_err(|reason| {
            SemanticIndexError::InvalidArtifact {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        info!(
            path = %path.display(),
            rows = rows,
            dim = dim,
            "Semantic index mapped"
        );

        Ok(Self {
            data: IndexData::Mapped(mmap),
            dim,
            rows,
        })
    }

    /// Builds an in-memory index from f32 vectors (tests and the offline
    /// builder; production loads the serialized artifact instead).
    pub fn from_vectors(vectors: &[Vec<f32>], dim: usize) -> SemanticIndexResult<Self> {
        let mut data = Vec::with_capacity(vectors.len() * dim);
        for vector in vectors {
            if vector.len() != dim {
                return Err(SemanticIndexError::DimensionMismatch {
                    artifact: dim,
                    vector: vector.len(),
                });
            }
            data.extend(vector.iter().map(|&v| f16::from_f32(v)));
        }

        Ok(Self {
            data: IndexData::Owned(data),
            dim,
            rows: vectors.len(),
        })
    }

    /// Number of indexed corpus sentences.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns `true` if no vectors are indexed.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Embedding dimension of the indexed vectors.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Finds the best corpus match for every query vector in one call.
    ///
    /// Returns one [`SearchHit`] per query; ties are broken by the
    /// first-encountered row. Empty queries produce an empty result.
    pub fn search_batch(&self, queries: &[Vec<f32>]) -> SemanticIndexResult<Vec<SearchHit>> {
        let mut hits = Vec::with_capacity(queries.len());
        for query in queries {
            if query.len() != self.dim {
                return Err(SemanticIndexError::InvalidQueryDimension {
                    expected: self.dim,
                    actual: query.len(),
                });
            }
            hits.push(self.search_one(query));
        }
        Ok(hits)
    }

    fn search_one(&self, query: &[f32]) -> SearchHit {
        let mut best = SearchHit { score: 0.0, row: 0 };
        let mut found = false;
        for row in 0..self.rows {
            let score = dot_f16_f32(self.row(row), query);
            // Strict comparison keeps the first-encountered row on ties.
            if !found || score > best.score {
                best = SearchHit { score, row };
                found = true;
            }
        }
        best
    }

    fn row(&self, index: usize) -> &[f16] {
        match &self.data {
            IndexData::Mapped(mmap) => {
                let stride = self.dim * 2;
                let start = HEADER_BYTES + index * stride;
                // The mapping is page-aligned and the offset is even, so the
                // 2-byte alignment bytemuck requires always holds.
                bytemuck::cast_slice(&mmap[start..start + stride])
            }
            IndexData::Owned(data) => &data[index * self.dim..(index + 1) * self.dim],
        }
    }
}

/// Writes the binary index artifact: 16-byte header then f16 rows.
pub fn write_artifact(
    path: &Path,
    vectors: &[Vec<f32>],
    dim: usize,
) -> SemanticIndexResult<()> {
    let bytes = encode_artifact(vectors, dim)?;

    let mut file = File::create(path).map_err(|source| SemanticIndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| SemanticIndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = vectors.len(), dim = dim, "Index artifact written");
    Ok(())
}

fn encode_artifact(vectors: &[Vec<f32>], dim: usize) -> SemanticIndexResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(HEADER_BYTES + vectors.len() * dim * 2);
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&(dim as u32).to_le_bytes());
    bytes.extend_from_slice(&(vectors.len() as u32).to_le_bytes());

    for vector in vectors {
        if vector.len() != dim {
            return Err(SemanticIndexError::DimensionMismatch {
                artifact: dim,
                vector: vector.len(),
            });
        }
        for &value in vector {
            bytes.extend_from_slice(&f16::from_f32(value).to_le_bytes());
        }
    }

    Ok(bytes)
}

fn validate_header(bytes: &[u8]) -> Result<(usize, usize), String> {
    if bytes.len() < HEADER_BYTES {
        return Err(format!("file too short: {} bytes", bytes.len()));
    }
    if bytes[0..4] != MAGIC {
        return Err("bad magic".to_string());
    }

    let version = u32::from_le_bytes(bytes[4..8].try_into().expect("4-byte slice"));
    if version != VERSION {
        return Err(format!("unsupported version {version}"));
    }

    let dim = u32::from_le_bytes(bytes[8..12].try_into().expect("4-byte slice")) as usize;
    let rows = u32::from_le_bytes(bytes[12..16].try_into().expect("4-byte slice")) as usize;
    if dim == 0 {
        return Err("zero embedding dimension".to_string());
    }

    let expected = HEADER_BYTES + rows * dim * 2;
    if bytes.len() != expected {
        return Err(format!(
            "size mismatch: expected {expected} bytes for {rows} rows, got {}",
            bytes.len()
        ));
    }

    Ok((dim, rows))
}

/// Inner product between an f16 corpus row and an f32 query.
#[inline]
pub fn dot_f16_f32(row: &[f16], query: &[f32]) -> f32 {
    if row.len() != query.len() || row.is_empty() {
        return 0.0;
    }

    row.iter()
        .zip(query.iter())
        .fold(0.0f32, |acc, (r, &q)| acc + r.to_f32() * q)
}
