//! Current-conditions lookup against wttr.in.

mod client;
mod error;
mod types;

pub use client::WeatherClient;
pub use error::WeatherError;
pub use types::CurrentConditions;
