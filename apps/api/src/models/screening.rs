use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted screening result, one per (application, job) pair. The
/// previous row is discarded on re-screening. Keyword lists are stored
/// comma-joined, mirroring how they are displayed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningResultRow {
    pub id: i32,
    pub application_id: i32,
    pub matching_score: f64,
    pub keywords_matched: Option<String>,
    pub keywords_missing: Option<String>,
    /// 1-based position within the job's batch; set by the ranking pass.
    pub ranking: Option<i32>,
    pub screened_at: DateTime<Utc>,
}

/// One line of the ranking list returned to HR.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RankingItemRow {
    pub rank: i32,
    pub application_id: i32,
    pub matching_score: f64,
    pub keywords_matched: Option<String>,
    pub keywords_missing: Option<String>,
    pub status: String,
    pub screened_at: DateTime<Utc>,
}
