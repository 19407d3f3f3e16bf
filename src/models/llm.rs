use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LlmError {
    #[error("AI model not configured")]
    NotConfigured,
    #[error("model request timed out")]
    Timeout,
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("model is rate limited")]
    RateLimited,
    #[error("model service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}
