//! Rule-based sentence segmentation.
//!
//! Deterministic and idempotent for identical input: the same text always
//! yields the same ordered sequence of sentences. Sentences are trimmed and
//! very short fragments are discarded.

use crate::constants::{MAX_DOCUMENT_CHARS, MIN_SENTENCE_CHARS};

/// Splits `text` into an ordered sequence of trimmed sentences.
///
/// Boundaries are sentence-ending punctuation (`.`, `!`, `?`, `…`) followed
/// by whitespace, plus hard line breaks. Input is capped at
/// [`MAX_DOCUMENT_CHARS`]; fragments shorter than [`MIN_SENTENCE_CHARS`]
/// are dropped.
pub fn segment(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut saw_terminator = false;

    for ch in text.chars().take(MAX_DOCUMENT_CHARS) {
        if ch == '\n' {
            flush(&mut current, &mut sentences);
            saw_terminator = false;
            continue;
        }

        if saw_terminator && ch.is_whitespace() {
            flush(&mut current, &mut sentences);
            saw_terminator = false;
            continue;
        }

        current.push(ch);
        saw_terminator = is_terminator(ch);
    }

    flush(&mut current, &mut sentences);
    sentences
}

#[inline]
fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '…')
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.chars().count() >= MIN_SENTENCE_CHARS {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
