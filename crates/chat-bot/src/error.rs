//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Telegram error: {0}")]
    Telegram(#[from] telegram_client::TelegramError),

    #[error("Weather error: {0}")]
    Weather(#[from] weather_client::WeatherError),

    #[error("Completion error: {0}")]
    Completion(#[from] completion_client::CompletionError),

    #[error("Handler failed: {0}")]
    Handler(String),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
