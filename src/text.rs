// Sentence splitting for paragraph mode.
//
// Splits on runs of sentence-final punctuation. Not a linguistic sentence
// breaker (abbreviations like "e.g." split too), but good enough to turn a
// paragraph into short, independently promptable units.

use regex_lite::Regex;
use std::sync::OnceLock;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"))
}

/// Split a paragraph into sentences.
///
/// A paragraph with no terminal punctuation comes back whole; a blank
/// paragraph produces no sentences.
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    let sentences: Vec<String> = sentence_pattern()
        .find_iter(paragraph)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        }
    } else {
        sentences
    }
}
