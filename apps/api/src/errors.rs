use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dataset::CsvError;
use crate::wizard::session::TransitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Remote generation failures never show up here: they select the fallback
/// strategy instead of failing the request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),
}

impl From<CsvError> for AppError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::InvalidFileType(_) => AppError::InvalidFileType(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidFileType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "INVALID_FILE_TYPE",
                msg.clone(),
            ),
            AppError::InvalidTransition(e) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_file_type_maps_to_415() {
        let err: AppError = CsvError::InvalidFileType("image/png".to_string()).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_transition_error_maps_to_409() {
        let err: AppError = TransitionError::AtFirstStep.into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_error_maps_to_400() {
        let err = AppError::Validation("Missing 'file' field".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
