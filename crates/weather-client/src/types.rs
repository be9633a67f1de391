//! wttr.in `format=j1` payload and the decoded current conditions.

use crate::error::WeatherError;
use serde::Deserialize;

/// Top-level `j1` document. Only the current conditions are read.
#[derive(Debug, Deserialize)]
pub(crate) struct J1Response {
    pub current_condition: Vec<RawCondition>,
}

/// wttr.in encodes every number as a string.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCondition {
    #[serde(rename = "temp_C")]
    pub temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    pub feels_like_c: String,
    pub humidity: String,
    #[serde(rename = "weatherDesc")]
    pub weather_desc: Vec<TextValue>,
    #[serde(rename = "windspeedKmph")]
    pub windspeed_kmph: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextValue {
    pub value: String,
}

/// Current weather at a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentConditions {
    /// Air temperature, °C.
    pub temp_c: i32,
    /// Apparent temperature, °C.
    pub feels_like_c: i32,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Human-readable condition, e.g. "Partly cloudy".
    pub description: String,
    /// Wind speed, km/h.
    pub wind_speed_kmph: u32,
}

impl TryFrom<J1Response> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(response: J1Response) -> Result<Self, Self::Error> {
        let raw = response
            .current_condition
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("current_condition is empty".into()))?;

        let description = raw
            .weather_desc
            .into_iter()
            .next()
            .map(|d| d.value)
            .ok_or_else(|| WeatherError::Malformed("weatherDesc is empty".into()))?;

        Ok(Self {
            temp_c: parse_field("temp_C", &raw.temp_c)?,
            feels_like_c: parse_field("FeelsLikeC", &raw.feels_like_c)?,
            humidity: parse_field("humidity", &raw.humidity)?,
            description,
            wind_speed_kmph: parse_field("windspeedKmph", &raw.windspeed_kmph)?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, WeatherError> {
    value
        .trim()
        .parse()
        .map_err(|_| WeatherError::Malformed(format!("{} is not a number: {:?}", name, value)))
}
