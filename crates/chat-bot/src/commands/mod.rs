//! Bot command handlers.

mod chat;
mod clock;
mod digits;
mod start;
mod weather;

pub use chat::{ChatHandler, ChatSettings};
pub use clock::ClockHandler;
pub use digits::DigitsHandler;
pub use start::{StartHandler, UnknownCommandHandler};
pub use weather::WeatherHandler;

use crate::error::AppResult;
use async_trait::async_trait;
use telegram_client::InboundMessage;

/// Produces the reply text for one inbound message.
///
/// Handlers are stateless across invocations and may be registered under
/// several commands and as the free-text fallback at the same time.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handler name used in logs.
    fn name(&self) -> &str;

    /// Execute the command.
    async fn execute(&self, message: &InboundMessage) -> AppResult<String>;
}
