//! Weather command - current conditions at the configured location.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use crate::format;
use crate::services::{
    FailureKind, ServiceRequest, SharedWeatherClient, Upstream, WeatherQuery,
};
use async_trait::async_trait;
use std::time::Duration;
use telegram_client::InboundMessage;
use tracing::{error, info, instrument, warn};

pub const TIMEOUT_REPLY: &str = "⚠️ Weather service timeout. Please try again later.";
pub const UNAVAILABLE_REPLY: &str = "⚠️ Unable to fetch weather data. Please try again later.";
pub const ERROR_REPLY: &str = "⚠️ An error occurred while fetching weather data.";

pub struct WeatherHandler {
    weather: SharedWeatherClient,
    location: String,
    timeout: Duration,
}

impl WeatherHandler {
    pub fn new(weather: SharedWeatherClient, location: impl Into<String>, timeout: Duration) -> Self {
        Self {
            weather,
            location: location.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CommandHandler for WeatherHandler {
    fn name(&self) -> &str {
        "weather"
    }

    #[instrument(skip(self, message), fields(chat = message.chat_id, location = %self.location))]
    async fn execute(&self, message: &InboundMessage) -> AppResult<String> {
        let request = ServiceRequest::new(
            Upstream::Weather,
            WeatherQuery::new(self.location.as_str()),
            self.timeout,
        );

        match self.weather.call(request).await {
            Ok(conditions) => {
                info!("Weather for {}: {}°C", self.location, conditions.temp_c);
                Ok(format::weather_report(&self.location, &conditions))
            }
            Err(failure) => match failure.kind {
                FailureKind::Timeout => {
                    warn!("Weather service timeout");
                    Ok(TIMEOUT_REPLY.into())
                }
                FailureKind::TransportError => {
                    error!("HTTP error getting weather: {}", failure.detail);
                    Ok(UNAVAILABLE_REPLY.into())
                }
                FailureKind::MalformedResponse | FailureKind::Unknown => {
                    error!("Error getting weather: {}", failure.detail);
                    Ok(ERROR_REPLY.into())
                }
            },
        }
    }
}
