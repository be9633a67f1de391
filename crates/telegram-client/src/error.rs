//! Telegram client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    /// Transport failure. The request URL is stripped because it embeds the bot token.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {status} - {description}")]
    Api { status: u16, description: String },

    #[error("Unauthorized: bot token rejected")]
    Unauthorized,
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}
