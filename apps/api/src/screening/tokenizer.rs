//! Text normalization for CV/JD comparison.
//!
//! Tokens are lowercase, split on any run of characters outside
//! `[a-z0-9#.+]` so that "c#", ".net" and "asp.net" survive intact.
//! Single characters and English stopwords are dropped; duplicates are
//! kept because term frequency feeds the TF-IDF weights downstream.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Common English function words excluded from scoring.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "from", "is", "are", "was", "were", "be", "been",
    "have", "has", "had", "do", "does", "did", "will", "would", "could",
    "should", "may", "might", "shall", "can", "this", "that", "these",
    "those", "i", "me", "my", "we", "our", "you", "your", "he", "his",
    "she", "her", "it", "its", "they", "their", "what", "which", "who",
    "when", "where", "how", "all", "each", "every", "both", "few", "more",
    "most", "other", "some", "such", "no", "not", "only", "same", "so",
    "than", "too", "very", "just", "about", "above", "after", "before",
];

fn stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '#' | '.' | '+')
}

/// Splits raw text into normalized tokens, preserving input order.
///
/// Empty or whitespace-only input yields an empty vec; never fails.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stopwords = stopword_set();

    lowered
        .split(|c: char| !is_token_char(c))
        .filter(|t| t.len() > 1)
        .filter(|t| !stopwords.contains(t))
        .map(str::to_owned)
        .collect()
}
