//! TF-IDF weighting over the shared two-document vocabulary.

/// Builds the deduplicated union of both token streams, first occurrence
/// wins. Both documents must be vectorized against this same ordering for
/// their vectors to be comparable.
pub fn build_vocabulary(a: &[String], b: &[String]) -> Vec<String> {
    let mut vocabulary = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for token in a.iter().chain(b.iter()) {
        if seen.insert(token.as_str()) {
            vocabulary.push(token.clone());
        }
    }
    vocabulary
}

/// Computes the TF-IDF vector of `tokens` over `vocabulary`.
///
/// `corpus` is the full set of documents being compared (here always the
/// resume and the job requirements, N = 2). Per term:
/// `tf = count / (len + 1e-10)`, `idf = ln(N / (df + 1) + 1)`, weight is
/// their product. The epsilon keeps empty documents from dividing by zero
/// and the nested `+1`s keep idf non-negative even when df = N.
pub fn tfidf_vector(tokens: &[String], vocabulary: &[String], corpus: &[&[String]]) -> Vec<f64> {
    let n = corpus.len() as f64;
    let total = tokens.len() as f64;

    vocabulary
        .iter()
        .map(|term| {
            let count = tokens.iter().filter(|t| *t == term).count() as f64;
            let tf = count / (total + 1e-10);

            let df = corpus
                .iter()
                .filter(|doc| doc.iter().any(|t| t == term))
                .count() as f64;
            let idf = (n / (df + 1.0) + 1.0).ln();

            tf * idf
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn vocabulary_is_dedup_union_in_first_occurrence_order() {
        let a = toks(&["rust", "sql", "rust"]);
        let b = toks(&["sql", "azure"]);
        assert_eq!(build_vocabulary(&a, &b), toks(&["rust", "sql", "azure"]));
    }

    #[test]
    fn vector_length_matches_vocabulary() {
        let a = toks(&["rust", "sql"]);
        let b = toks(&["azure"]);
        let vocab = build_vocabulary(&a, &b);
        let v = tfidf_vector(&a, &vocab, &[&a, &b]);
        assert_eq!(v.len(), vocab.len());
    }

    #[test]
    fn empty_document_yields_zero_vector_without_panicking() {
        let a = toks(&[]);
        let b = toks(&["rust"]);
        let vocab = build_vocabulary(&a, &b);
        let v = tfidf_vector(&a, &vocab, &[&a, &b]);
        assert!(v.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn weights_are_never_negative() {
        // Term present in every corpus document: df = N, idf = ln(N/(N+1)+1) > 0.
        let a = toks(&["rust", "rust", "sql"]);
        let b = toks(&["rust"]);
        let vocab = build_vocabulary(&a, &b);
        for v in [tfidf_vector(&a, &vocab, &[&a, &b]), tfidf_vector(&b, &vocab, &[&a, &b])] {
            assert!(v.iter().all(|w| *w >= 0.0), "negative weight in {v:?}");
        }
    }

    #[test]
    fn rarer_terms_weigh_more_than_shared_terms() {
        // "azure" appears only in b, "rust" in both; at equal tf the idf
        // of the rarer term must dominate.
        let a = toks(&["rust"]);
        let b = toks(&["rust", "azure"]);
        let vocab = build_vocabulary(&a, &b);
        let v = tfidf_vector(&b, &vocab, &[&a, &b]);
        let rust_w = v[vocab.iter().position(|t| t == "rust").unwrap()];
        let azure_w = v[vocab.iter().position(|t| t == "azure").unwrap()];
        assert!(azure_w > rust_w);
    }
}
