//! Cosine similarity and keyword match analysis.

use crate::screening::keywords::tech_keyword_set;

/// Cosine of the angle between two equal-length weight vectors, in [0, 1]
/// for non-negative inputs. Degenerate vectors (norm below 1e-10) resolve
/// to 0.0 instead of producing NaN or a division error.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator < 1e-10 {
        0.0
    } else {
        dot / denominator
    }
}

/// Converts a [0,1] similarity into a percentage rounded to 2 decimals.
pub fn to_percent(similarity: f64) -> f64 {
    (similarity * 100.0 * 100.0).round() / 100.0
}

/// Technology keywords the job asks for, split into those covered by the
/// resume and those absent from it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordAnalysis {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Intersects both token streams with the curated keyword set.
///
/// Output order follows the first occurrence of each keyword in the job
/// token stream, not alphabetical order. Tokens are already lowercase so
/// comparison is case-insensitive by construction.
pub fn analyze_keywords(job_tokens: &[String], resume_tokens: &[String]) -> KeywordAnalysis {
    let keyword_set = tech_keyword_set();

    let resume_keywords: std::collections::HashSet<&str> = resume_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| keyword_set.contains(t))
        .collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for token in job_tokens {
        if !keyword_set.contains(token.as_str()) || !seen.insert(token.as_str()) {
            continue;
        }
        if resume_keywords.contains(token.as_str()) {
            matched.push(token.clone());
        } else {
            missing.push(token.clone());
        }
    }

    KeywordAnalysis { matched, missing }
}
