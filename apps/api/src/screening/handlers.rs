//! HTTP surface of the recruitment screening workflow. Handlers own all
//! persistence; the scoring engine itself stays pure.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::principal::Principal;
use crate::auth::registry::ops;
use crate::auth::require;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, CvParsedRow, JobDescriptionRow};
use crate::models::screening::{RankingItemRow, ScreeningResultRow};
use crate::screening::engine::{screen, screen_batch, BatchCandidate, RankingEntry, ScreeningOutcome};
use crate::screening::extract::TextExtractor;
use crate::screening::parser::parse_cv;
use crate::state::AppState;

const ALLOWED_CV_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
const MAX_CV_FILE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ScreenOneResponse {
    pub application_id: i32,
    pub matching_score: f64,
    pub keywords_matched: Vec<String>,
    pub keywords_missing: Vec<String>,
    pub screened_at: DateTime<Utc>,
}

/// POST /api/screening/:application_id
/// Scores one candidate's CV against the job's required skills,
/// superseding any previous result for the pair.
pub async fn handle_screen_one(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(application_id): Path<i32>,
) -> Result<Json<ScreenOneResponse>, AppError> {
    require(&state, &principal, ops::SCREEN_ONE).await?;

    let application = fetch_application(&state, application_id).await?;
    let cv_text = fetch_cv_text(&state, application_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Application #{application_id} has no parsed CV text; upload and parse the CV first"
            ))
        })?;
    let jd = fetch_job_description(&state, application.job_description_id).await?;

    let outcome = screen(&cv_text, &jd.required_skills);
    persist_result(&state, application_id, &outcome).await?;

    Ok(Json(ScreenOneResponse {
        application_id,
        matching_score: outcome.matching_score,
        keywords_matched: outcome.keywords_matched,
        keywords_missing: outcome.keywords_missing,
        screened_at: outcome.scored_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct ScreenBatchResponse {
    pub jd_id: i32,
    pub processed: usize,
    pub skipped: usize,
    pub ranking: Vec<RankingEntry>,
}

/// POST /api/screening/batch/:jd_id
/// Screens every candidate of one job description, then rewrites the full
/// ranking. Candidates without extracted text are skipped, never fatal.
pub async fn handle_screen_batch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(jd_id): Path<i32>,
) -> Result<Json<ScreenBatchResponse>, AppError> {
    require(&state, &principal, ops::SCREEN_BATCH).await?;

    let jd = fetch_job_description(&state, jd_id).await?;

    let rows = sqlx::query_as::<_, (i32, Option<String>, Option<String>)>(
        r#"
        SELECT a.id, p.raw_text, p.skills_extracted
        FROM applications a
        LEFT JOIN cv_parsed_data p ON p.application_id = a.id
        WHERE a.job_description_id = $1
        "#,
    )
    .bind(jd_id)
    .fetch_all(&state.db)
    .await?;

    if rows.is_empty() {
        return Err(AppError::Validation(format!(
            "Job description #{jd_id} has no applications to screen"
        )));
    }

    let candidates: Vec<BatchCandidate> = rows
        .into_iter()
        .map(|(application_id, raw_text, skills)| BatchCandidate {
            application_id,
            resume_text: raw_text.or(skills),
        })
        .collect();

    let batch = screen_batch(&jd.required_skills, &candidates);

    for (application_id, outcome) in &batch.results {
        persist_result(&state, *application_id, outcome).await?;
    }
    rewrite_ranking(&state, jd_id).await?;

    info!(
        jd_id,
        processed = batch.processed,
        skipped = batch.skipped,
        "batch screening complete, ranking rewritten"
    );

    Ok(Json(ScreenBatchResponse {
        jd_id,
        processed: batch.processed,
        skipped: batch.skipped,
        ranking: batch.ranking,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    #[serde(default = "default_top")]
    pub top: i64,
    #[serde(default)]
    pub min_score: f64,
}

fn default_top() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub jd_id: i32,
    pub total: usize,
    pub min_score: f64,
    pub ranking: Vec<RankingItemRow>,
}

/// GET /api/screening/ranking/:jd_id?top=20&min_score=0
pub async fn handle_ranking(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(jd_id): Path<i32>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, AppError> {
    require(&state, &principal, ops::SCREENING_RANKING).await?;

    fetch_job_description(&state, jd_id).await?;

    let ranking = sqlx::query_as::<_, RankingItemRow>(
        r#"
        SELECT COALESCE(sr.ranking, 0) AS rank,
               sr.application_id,
               sr.matching_score,
               sr.keywords_matched,
               sr.keywords_missing,
               a.status,
               sr.screened_at
        FROM screening_results sr
        JOIN applications a ON a.id = sr.application_id
        WHERE a.job_description_id = $1 AND sr.matching_score >= $2
        ORDER BY sr.matching_score DESC
        LIMIT $3
        "#,
    )
    .bind(jd_id)
    .bind(params.min_score)
    .bind(params.top)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(RankingResponse {
        jd_id,
        total: ranking.len(),
        min_score: params.min_score,
        ranking,
    }))
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetailResponse {
    pub application: ApplicationRow,
    pub parsed_cv: Option<CvParsedRow>,
    pub screening_result: Option<ScreeningResultRow>,
}

/// GET /api/applications/:id
/// Application record with its extracted CV fields and latest screening
/// result, when present.
pub async fn handle_application_detail(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(application_id): Path<i32>,
) -> Result<Json<ApplicationDetailResponse>, AppError> {
    require(&state, &principal, ops::VIEW_APPLICATION).await?;

    let application = fetch_application(&state, application_id).await?;

    let parsed_cv = sqlx::query_as::<_, CvParsedRow>(
        "SELECT application_id, raw_text, full_name, email_extracted, phone_extracted, \
         skills_extracted, education_extracted, experience_extracted, parsed_at \
         FROM cv_parsed_data WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_optional(&state.db)
    .await?;

    let screening_result = sqlx::query_as::<_, ScreeningResultRow>(
        "SELECT id, application_id, matching_score, keywords_matched, keywords_missing, \
         ranking, screened_at \
         FROM screening_results WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_optional(&state.db)
    .await?;

    Ok(Json(ApplicationDetailResponse {
        application,
        parsed_cv,
        screening_result,
    }))
}

#[derive(Debug, Serialize)]
pub struct UploadCvResponse {
    pub application_id: i32,
    pub cv_file_path: String,
    /// Whether best-effort parsing produced extracted fields. False means
    /// extraction failed; the upload itself still succeeded.
    pub parsed: bool,
}

/// POST /api/applications/:id/cv
/// Stores the uploaded CV, then parses it best-effort: an extraction
/// failure is logged and reported, never fatal to the submission.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(application_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<UploadCvResponse>, AppError> {
    require(&state, &principal, ops::UPLOAD_CV).await?;

    fetch_application(&state, application_id).await?;

    let (file_name, bytes) = read_cv_field(&mut multipart).await?;
    let extension = validate_cv_file(&file_name, bytes.len())?;

    let stored_name = format!("{}.{extension}", Uuid::new_v4());
    let stored_path = PathBuf::from(&state.config.uploads_dir).join(&stored_name);
    tokio::fs::create_dir_all(&state.config.uploads_dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    tokio::fs::write(&stored_path, &bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    sqlx::query("UPDATE applications SET cv_file_path = $1 WHERE id = $2")
        .bind(&stored_name)
        .bind(application_id)
        .execute(&state.db)
        .await?;

    // Fire-and-continue enrichment: screening input is best-effort, the
    // submission never fails because a document would not parse.
    let parsed = match extract_text(Arc::clone(&state.extractor), stored_path.clone()).await {
        Ok(raw_text) => {
            persist_parsed_cv(&state, application_id, &raw_text).await?;
            true
        }
        Err(e) => {
            warn!(application_id, error = %e, "CV text extraction failed; submission accepted unparsed");
            false
        }
    };

    Ok(Json(UploadCvResponse {
        application_id,
        cv_file_path: stored_name,
        parsed,
    }))
}

async fn read_cv_field(multipart: &mut Multipart) -> Result<(String, bytes::Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::Validation("CV file part has no filename".to_string()))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read CV upload: {e}")))?;
            return Ok((file_name, bytes));
        }
    }
    Err(AppError::Validation(
        "Multipart body is missing the 'file' part".to_string(),
    ))
}

fn validate_cv_file(file_name: &str, size: usize) -> Result<String, AppError> {
    let extension = FsPath::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ALLOWED_CV_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "CV must be one of {ALLOWED_CV_EXTENSIONS:?}, got '{file_name}'"
        )));
    }
    if size == 0 {
        return Err(AppError::Validation("CV file is empty".to_string()));
    }
    if size > MAX_CV_FILE_BYTES {
        return Err(AppError::Validation(format!(
            "CV file exceeds the {} MB limit",
            MAX_CV_FILE_BYTES / (1024 * 1024)
        )));
    }
    Ok(extension)
}

/// Extraction is blocking (PDF parsing), so it runs off the async runtime.
async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    path: PathBuf,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extractor.extract_plain_text(&path))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(AppError::Extraction)
}

async fn persist_parsed_cv(
    state: &AppState,
    application_id: i32,
    raw_text: &str,
) -> Result<(), AppError> {
    let parsed = parse_cv(raw_text);

    sqlx::query(
        r#"
        INSERT INTO cv_parsed_data
            (application_id, raw_text, full_name, email_extracted, phone_extracted,
             skills_extracted, education_extracted, experience_extracted, parsed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (application_id) DO UPDATE SET
            raw_text = EXCLUDED.raw_text,
            full_name = EXCLUDED.full_name,
            email_extracted = EXCLUDED.email_extracted,
            phone_extracted = EXCLUDED.phone_extracted,
            skills_extracted = EXCLUDED.skills_extracted,
            education_extracted = EXCLUDED.education_extracted,
            experience_extracted = EXCLUDED.experience_extracted,
            parsed_at = EXCLUDED.parsed_at
        "#,
    )
    .bind(application_id)
    .bind(raw_text)
    .bind(&parsed.full_name)
    .bind(&parsed.email)
    .bind(&parsed.phone)
    .bind(&parsed.skills)
    .bind(&parsed.education)
    .bind(&parsed.experience)
    .bind(parsed.parsed_at)
    .execute(&state.db)
    .await?;

    Ok(())
}

async fn fetch_application(state: &AppState, id: i32) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT id, job_description_id, applicant_user_id, cv_file_path, status, apply_date \
         FROM applications WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application #{id} not found")))
}

async fn fetch_job_description(state: &AppState, id: i32) -> Result<JobDescriptionRow, AppError> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT id, title, required_skills FROM job_descriptions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job description #{id} not found")))
}

/// Raw CV text for screening, falling back to the extracted skills blob
/// when full text is unavailable.
async fn fetch_cv_text(state: &AppState, application_id: i32) -> Result<Option<String>, AppError> {
    let row = sqlx::query_as::<_, (Option<String>, Option<String>)>(
        "SELECT raw_text, skills_extracted FROM cv_parsed_data WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_optional(&state.db)
    .await?;

    Ok(row.and_then(|(raw_text, skills)| raw_text.or(skills)))
}

/// Replaces the stored result for one application.
async fn persist_result(
    state: &AppState,
    application_id: i32,
    outcome: &ScreeningOutcome,
) -> Result<(), AppError> {
    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM screening_results WHERE application_id = $1")
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO screening_results
            (application_id, matching_score, keywords_matched, keywords_missing, screened_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(application_id)
    .bind(outcome.matching_score)
    .bind(outcome.keywords_matched.join(", "))
    .bind(outcome.keywords_missing.join(", "))
    .bind(outcome.scored_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE applications SET status = 'SCREENING' WHERE id = $1")
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Rewrites 1-based contiguous ranks for every stored result of one job,
/// score descending. Runs strictly after all batch scores are committed.
async fn rewrite_ranking(state: &AppState, jd_id: i32) -> Result<(), AppError> {
    let result_ids = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT sr.id
        FROM screening_results sr
        JOIN applications a ON a.id = sr.application_id
        WHERE a.job_description_id = $1
        ORDER BY sr.matching_score DESC
        "#,
    )
    .bind(jd_id)
    .fetch_all(&state.db)
    .await?;

    let mut tx = state.db.begin().await?;
    for (i, result_id) in result_ids.iter().enumerate() {
        sqlx::query("UPDATE screening_results SET ranking = $1 WHERE id = $2")
            .bind(i as i32 + 1)
            .bind(result_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cv_validation_accepts_allowed_extensions() {
        assert_eq!(validate_cv_file("resume.pdf", 100).unwrap(), "pdf");
        assert_eq!(validate_cv_file("resume.DOC", 100).unwrap(), "doc");
        assert_eq!(validate_cv_file("resume.docx", 100).unwrap(), "docx");
    }

    #[test]
    fn cv_validation_rejects_unknown_extensions() {
        assert!(validate_cv_file("resume.exe", 100).is_err());
        assert!(validate_cv_file("resume", 100).is_err());
    }

    #[test]
    fn cv_validation_rejects_empty_and_oversized_files() {
        assert!(validate_cv_file("resume.pdf", 0).is_err());
        assert!(validate_cv_file("resume.pdf", MAX_CV_FILE_BYTES + 1).is_err());
        assert!(validate_cv_file("resume.pdf", MAX_CV_FILE_BYTES).is_ok());
    }
}
