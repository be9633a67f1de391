//! wttr.in HTTP client (free, no API key required).

use crate::error::WeatherError;
use crate::types::{CurrentConditions, J1Response};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the wttr.in JSON API.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a new weather client. `timeout` bounds every request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions for a named location.
    #[instrument(skip(self))]
    pub async fn current(&self, location: &str) -> Result<CurrentConditions, WeatherError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(WeatherError::InvalidLocation("empty location".into()));
        }

        let url = format!(
            "{}/{}?format=j1",
            self.base_url,
            urlencoding::encode(location)
        );
        debug!(%url, "Fetching weather");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            warn!(status = status.as_u16(), "Weather service error");
            return Err(WeatherError::Status {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let parsed: J1Response = serde_json::from_str(&body)?;
        CurrentConditions::try_from(parsed)
    }
}
