use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::extract::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Missing permission {command_id} on {function_id}")]
    PermissionDenied {
        function_id: String,
        command_id: String,
    },

    #[error("Could not identify the calling user")]
    UnknownIdentity,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Authentication required".to_string(),
                None,
            ),
            AppError::PermissionDenied {
                function_id,
                command_id,
            } => (
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
                self.to_string(),
                // Denials name the missing pair to aid debugging; they
                // never include anyone's granted permissions.
                Some(json!({
                    "function_id": function_id,
                    "command_id": command_id,
                })),
            ),
            AppError::UnknownIdentity => (
                StatusCode::UNAUTHORIZED,
                "UNKNOWN_IDENTITY",
                self.to_string(),
                None,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILED",
                e.to_string(),
                None,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(detail) = detail {
            error["detail"] = detail;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_message_names_the_pair() {
        let err = AppError::PermissionDenied {
            function_id: "RECRUITMENT_CV".to_string(),
            command_id: "DELETE".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("RECRUITMENT_CV"));
        assert!(msg.contains("DELETE"));
    }

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            AppError::NotAuthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::UnknownIdentity.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        let denied = AppError::PermissionDenied {
            function_id: "X".to_string(),
            command_id: "VIEW".to_string(),
        };
        assert_eq!(denied.into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
