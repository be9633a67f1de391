//! Clock command - reports the server's local time.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use crate::format;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use telegram_client::InboundMessage;

pub struct ClockHandler {
    now: fn() -> DateTime<Local>,
}

impl ClockHandler {
    pub fn new() -> Self {
        Self { now: Local::now }
    }

    /// Use a fixed time source instead of the system clock.
    pub fn with_clock(now: fn() -> DateTime<Local>) -> Self {
        Self { now }
    }
}

impl Default for ClockHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for ClockHandler {
    fn name(&self) -> &str {
        "clock"
    }

    async fn execute(&self, _message: &InboundMessage) -> AppResult<String> {
        Ok(format::clock_time(&(self.now)()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 7, 4, 9, 5, 0).earliest().unwrap()
    }

    #[tokio::test]
    async fn test_reports_fixed_clock() {
        let handler = ClockHandler::with_clock(fixed_now);
        let reply = handler.execute(&InboundMessage::new(1, "time?")).await.unwrap();
        assert_eq!(reply, "09:05 AM, July 04, 2024");
    }

    #[tokio::test]
    async fn test_system_clock_shape() {
        let reply = ClockHandler::new()
            .execute(&InboundMessage::new(1, "/time"))
            .await
            .unwrap();
        assert!(reply.contains("AM, ") || reply.contains("PM, "));
        assert_eq!(&reply[2..3], ":");
    }
}
