//! Chat-completion client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty response from AI service")]
    EmptyResponse,
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout
        } else {
            CompletionError::Http(err)
        }
    }
}
