use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One candidate application for a job description.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: i32,
    pub job_description_id: i32,
    pub applicant_user_id: String,
    pub cv_file_path: Option<String>,
    pub status: String,
    pub apply_date: DateTime<Utc>,
}

/// Fields heuristically extracted from an uploaded CV. One row per
/// application, replaced wholesale on re-parse.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvParsedRow {
    pub application_id: i32,
    pub raw_text: Option<String>,
    pub full_name: Option<String>,
    pub email_extracted: Option<String>,
    pub phone_extracted: Option<String>,
    pub skills_extracted: Option<String>,
    pub education_extracted: Option<String>,
    pub experience_extracted: Option<String>,
    pub parsed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: i32,
    pub title: String,
    /// Free-text required-skills blob fed to the screening engine.
    pub required_skills: String,
}
