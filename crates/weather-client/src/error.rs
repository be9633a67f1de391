//! Weather lookup errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Request did not complete within the timeout.
    #[error("Weather request timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("Weather service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was received but did not have the expected shape.
    #[error("Malformed weather payload: {0}")]
    Malformed(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else if err.is_decode() {
            WeatherError::Malformed(err.to_string())
        } else {
            WeatherError::Http(err)
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Malformed(err.to_string())
    }
}
