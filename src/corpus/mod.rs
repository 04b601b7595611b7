//! Reference-corpus sentence metadata.
//!
//! The corpus is produced offline (see [`crate::semindex::write_artifact`])
//! and loaded read-only at startup. Each entry describes one indexed
//! sentence; the entry's position in the list matches its row in the vector
//! artifact.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse corpus metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One indexed corpus sentence. Immutable once the corpus is built.
///
/// `source_id` + `ordinal` uniquely identify a sentence within the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Identifier of the source document (typically a file name).
    pub source_id: String,
    /// Position of the sentence within its source document.
    pub ordinal: u32,
    /// The sentence text.
    pub text: String,
}

impl CorpusEntry {
    pub fn new(source_id: impl Into<String>, ordinal: u32, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ordinal,
            text: text.into(),
        }
    }

    /// Truncated sentence text for human-readable report snippets.
    pub fn snippet(&self, max_chars: usize) -> String {
        let truncated: String = self.text.chars().take(max_chars).collect();
        format!("{} (similar to: \"{}...\")", self.source_id, truncated)
    }
}

/// Loads the serialized corpus metadata (JSON list of entries).
pub fn load_metadata(path: &Path) -> Result<Vec<CorpusEntry>, CorpusError> {
    let file = File::open(path)?;
    let entries: Vec<CorpusEntry> = serde_json::from_reader(BufReader::new(file))?;

    info!(
        path = %path.display(),
        sentences = entries.len(),
        "Corpus metadata loaded"
    );

    Ok(entries)
}

/// Groups corpus sentences back into full documents, ordered by ordinal.
///
/// Used to build the lexical index, which works at document granularity.
pub fn group_by_source(entries: &[CorpusEntry]) -> Vec<(String, String)> {
    let mut documents: BTreeMap<&str, Vec<&CorpusEntry>> = BTreeMap::new();
    for entry in entries {
        documents.entry(&entry.source_id).or_default().push(entry);
    }

    documents
        .into_iter()
        .map(|(source_id, mut sentences)| {
            sentences.sort_by_key(|e| e.ordinal);
            let text = sentences
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            (source_id.to_string(), text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_metadata_roundtrip() {
        let entries = vec![
            CorpusEntry::new("bio.txt", 0, "The mitochondria is the powerhouse of the cell."),
            CorpusEntry::new("bio.txt", 1, "Cells divide through mitosis."),
        ];

        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &entries).unwrap();
        file.flush().unwrap();

        let loaded = load_metadata(file.path()).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_metadata_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json at all").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_metadata(file.path()),
            Err(CorpusError::Parse(_))
        ));
    }

    #[test]
    fn test_group_by_source_orders_by_ordinal() {
        let entries = vec![
            CorpusEntry::new("b.txt", 1, "Second of b."),
            CorpusEntry::new("a.txt", 0, "Only sentence of a."),
            CorpusEntry::new("b.txt", 0, "First of b."),
        ];

        let documents = group_by_source(&entries);

        assert_eq!(
            documents,
            vec![
                ("a.txt".to_string(), "Only sentence of a.".to_string()),
                ("b.txt".to_string(), "First of b. Second of b.".to_string()),
            ]
        );
    }

    #[test]
    fn test_snippet_truncates() {
        let entry = CorpusEntry::new("src.txt", 0, "abcdefghij");
        assert_eq!(entry.snippet(4), "src.txt (similar to: \"abcd...\")");
    }
}
