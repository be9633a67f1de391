//! Reply templates.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use weather_client::CurrentConditions;

/// Render current conditions with the fixed weather template.
pub fn weather_report(location: &str, conditions: &CurrentConditions) -> String {
    format!(
        "🌤 Weather in {}:\n\n\
         Temperature: {}°C (feels like {}°C)\n\
         Conditions: {}\n\
         Humidity: {}%\n\
         Wind Speed: {} km/h",
        location,
        conditions.temp_c,
        conditions.feels_like_c,
        conditions.description,
        conditions.humidity,
        conditions.wind_speed_kmph,
    )
}

/// `03:07 PM, March 05, 2024`
pub fn clock_time<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%I:%M %p, %B %d, %Y").to_string()
}
