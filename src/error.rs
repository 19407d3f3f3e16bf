use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

/// Seconds a client is told to wait before retrying a collaborator failure.
pub const RETRY_AFTER_SECS: u32 = 30;

/// Request-level failure taxonomy.
///
/// Extraction failures are deliberately absent: a response that cannot be
/// structured is still returned as raw text, never as an error.
#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Telemetry or model collaborator unreachable or timed out. Retryable.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Collaborator answered, but with data that failed validation.
    #[error("{0}")]
    BadUpstreamData(String),
    /// The model collaborator failed; message is the error-shaped result text.
    #[error("{0}")]
    GenerationFailed(String),
    #[error("storage failure: {0}")]
    StorageFailure(#[from] sqlx::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_failed",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::BadUpstreamData(_) => "bad_upstream_data",
            AppError::GenerationFailed(_) => "generation_failed",
            AppError::StorageFailure(_) => "storage_failure",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::ServiceUnavailable(_) | AppError::GenerationFailed(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) | AppError::GenerationFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::BadUpstreamData(_) => StatusCode::BAD_GATEWAY,
            AppError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::StorageFailure(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = HttpResponse::build(self.status_code());
        if self.is_retryable() {
            response.insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS.to_string()));
        }
        response.json(json!({
            "success": false,
            "error": self.code(),
            "message": message
        }))
    }
}
