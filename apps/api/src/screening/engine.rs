//! CV screening engine — orchestrates tokenizer, vectorizer and scorer
//! into one scoring operation per (resume, job) pair, plus a batch mode
//! that ranks every candidate for a job.
//!
//! The engine is pure: no I/O, no DB access. Persistence of results is
//! the caller's responsibility (see `screening::handlers`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::screening::similarity::{analyze_keywords, cosine_similarity, to_percent};
use crate::screening::tokenizer::tokenize;
use crate::screening::vectorizer::{build_vocabulary, tfidf_vector};

/// Outcome of screening one resume against one job's required skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    /// 0–100, rounded to 2 decimals.
    pub matching_score: f64,
    pub keywords_matched: Vec<String>,
    pub keywords_missing: Vec<String>,
    pub scored_at: DateTime<Utc>,
}

/// One candidate fed into batch screening.
#[derive(Debug, Clone)]
pub struct BatchCandidate {
    pub application_id: i32,
    /// Extracted resume text; `None` when CV parsing never ran or failed.
    pub resume_text: Option<String>,
}

/// Ranked position of one scored application within a job's batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based, contiguous.
    pub rank: i32,
    pub application_id: i32,
    pub score: f64,
}

/// Result of a batch run: per-candidate outcomes plus the recomputed
/// ranking and processed/skipped counts.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<(i32, ScreeningOutcome)>,
    pub ranking: Vec<RankingEntry>,
    pub processed: usize,
    pub skipped: usize,
}

/// Scores one resume text against one job's required-skills text.
///
/// Deterministic for fixed inputs (timestamp aside): same texts always
/// produce the same score and keyword sets.
pub fn screen(resume_text: &str, required_skills: &str) -> ScreeningOutcome {
    let resume_tokens = tokenize(resume_text);
    let job_tokens = tokenize(required_skills);

    let vocabulary = build_vocabulary(&resume_tokens, &job_tokens);
    let corpus: [&[String]; 2] = [&resume_tokens, &job_tokens];

    let resume_vector = tfidf_vector(&resume_tokens, &vocabulary, &corpus);
    let job_vector = tfidf_vector(&job_tokens, &vocabulary, &corpus);

    let similarity = cosine_similarity(&resume_vector, &job_vector);
    let analysis = analyze_keywords(&job_tokens, &resume_tokens);

    ScreeningOutcome {
        matching_score: to_percent(similarity),
        keywords_matched: analysis.matched,
        keywords_missing: analysis.missing,
        scored_at: Utc::now(),
    }
}

/// Screens every candidate that has extracted text, then recomputes the
/// full ranking for the job.
///
/// Candidates without text are skipped and counted; a skipped candidate
/// never aborts the batch and is excluded from ranking.
pub fn screen_batch(required_skills: &str, candidates: &[BatchCandidate]) -> BatchOutcome {
    let mut results = Vec::new();
    let mut skipped = 0;

    for candidate in candidates {
        match candidate.resume_text.as_deref() {
            Some(text) => {
                let outcome = screen(text, required_skills);
                results.push((candidate.application_id, outcome));
            }
            None => skipped += 1,
        }
    }

    let scored: Vec<(i32, f64)> = results
        .iter()
        .map(|(id, outcome)| (*id, outcome.matching_score))
        .collect();
    let ranking = rank(&scored);

    BatchOutcome {
        processed: results.len(),
        skipped,
        results,
        ranking,
    }
}

/// Assigns contiguous 1-based ranks by score descending. The sort is
/// stable, so ties keep their input order.
pub fn rank(scored: &[(i32, f64)]) -> Vec<RankingEntry> {
    let mut ordered: Vec<(i32, f64)> = scored.to_vec();
    ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (application_id, score))| RankingEntry {
            rank: i as i32 + 1,
            application_id,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_score_one_hundred() {
        let text = "Senior C# developer with SQL and Azure experience";
        let outcome = screen(text, text);
        assert!(
            (outcome.matching_score - 100.0).abs() < 0.01,
            "score was {}",
            outcome.matching_score
        );
    }

    #[test]
    fn disjoint_documents_score_zero() {
        let outcome = screen("python pandas numpy", "java spring hibernate");
        assert_eq!(outcome.matching_score, 0.0);
    }

    #[test]
    fn empty_resume_scores_zero_without_error() {
        let outcome = screen("", "Require C# SQL");
        assert_eq!(outcome.matching_score, 0.0);
        assert_eq!(outcome.keywords_matched, Vec::<String>::new());
        assert_eq!(outcome.keywords_missing, vec!["c#", "sql"]);
    }

    #[test]
    fn overlapping_documents_score_above_zero_with_keyword_split() {
        let outcome = screen(
            "Experienced C# and SQL developer",
            "Require C# SQL Azure",
        );
        assert!(outcome.matching_score > 0.0);
        assert!(outcome.keywords_matched.contains(&"c#".to_string()));
        assert!(outcome.keywords_matched.contains(&"sql".to_string()));
        assert!(outcome.keywords_missing.contains(&"azure".to_string()));
    }

    #[test]
    fn screening_is_idempotent_modulo_timestamp() {
        let resume = "Experienced C# and SQL developer";
        let job = "Require C# SQL Azure";
        let first = screen(resume, job);
        let second = screen(resume, job);
        assert_eq!(first.matching_score, second.matching_score);
        assert_eq!(first.keywords_matched, second.keywords_matched);
        assert_eq!(first.keywords_missing, second.keywords_missing);
    }

    #[test]
    fn rank_orders_by_score_descending_contiguously() {
        let ranking = rank(&[(1, 40.0), (2, 90.0), (3, 70.0)]);
        assert_eq!(
            ranking,
            vec![
                RankingEntry { rank: 1, application_id: 2, score: 90.0 },
                RankingEntry { rank: 2, application_id: 3, score: 70.0 },
                RankingEntry { rank: 3, application_id: 1, score: 40.0 },
            ]
        );
    }

    #[test]
    fn rank_breaks_ties_by_input_order() {
        let ranking = rank(&[(7, 50.0), (8, 50.0), (9, 60.0)]);
        assert_eq!(ranking[0].application_id, 9);
        assert_eq!(ranking[1].application_id, 7);
        assert_eq!(ranking[2].application_id, 8);
    }

    #[test]
    fn batch_skips_candidates_without_text() {
        let candidates = vec![
            BatchCandidate { application_id: 1, resume_text: Some("c# sql developer".into()) },
            BatchCandidate { application_id: 2, resume_text: None },
            BatchCandidate { application_id: 3, resume_text: Some("azure devops engineer".into()) },
        ];
        let outcome = screen_batch("c# sql azure", &candidates);
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.ranking.len(), 2);
        assert!(outcome.ranking.iter().all(|r| r.application_id != 2));
    }

    #[test]
    fn batch_ranking_is_one_based_and_contiguous() {
        let candidates: Vec<BatchCandidate> = (1..=4)
            .map(|id| BatchCandidate {
                application_id: id,
                resume_text: Some(format!("{} c# sql", "filler ".repeat(id as usize))),
            })
            .collect();
        let outcome = screen_batch("c# sql", &candidates);
        let ranks: Vec<i32> = outcome.ranking.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }
}
