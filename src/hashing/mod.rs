//! Content hashing for the result cache.
//!
//! Cache keys are derived from the document text itself (content-addressed),
//! so identical text hashes to the same key regardless of request origin.

/// Hashes a document's normalized text to a 32-byte BLAKE3 digest.
///
/// Leading/trailing whitespace is stripped before hashing so that trivially
/// re-submitted documents (trailing newline added by an editor, etc.) share
/// a cache entry.
#[inline]
pub fn hash_document(text: &str) -> [u8; 32] {
    *blake3::hash(text.trim().as_bytes()).as_bytes()
}

/// Lowercase hex encoding of a document hash (used for cache file names).
pub fn hash_hex(hash: &[u8; 32]) -> String {
    let mut out = String::with_capacity(64);
    for byte in hash {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_document_determinism() {
        let text = "The mitochondria is the powerhouse of the cell.";

        let hash1 = hash_document(text);
        let hash2 = hash_document(text);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_document_uniqueness() {
        let documents = [
            "The mitochondria is the powerhouse of the cell.",
            "The mitochondria is the powerhouse of the cell",
            "the mitochondria is the powerhouse of the cell.",
            "A completely different document.",
        ];

        let hashes: Vec<_> = documents.iter().map(|d| hash_document(d)).collect();
        let unique: HashSet<_> = hashes.iter().collect();

        assert_eq!(unique.len(), documents.len());
    }

    #[test]
    fn test_hash_document_normalizes_outer_whitespace() {
        let hash1 = hash_document("Some document text.");
        let hash2 = hash_document("  Some document text.\n\n");

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_hex_format() {
        let hash = hash_document("test");
        let hex = hash_hex(&hash);

        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex, hex.to_lowercase());
    }
}
