//! Start/help command and the reply for unregistered commands.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use telegram_client::InboundMessage;

/// Static capability description.
pub struct StartHandler {
    text: String,
}

impl StartHandler {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl CommandHandler for StartHandler {
    fn name(&self) -> &str {
        "start"
    }

    async fn execute(&self, _message: &InboundMessage) -> AppResult<String> {
        Ok(self.text.clone())
    }
}

/// Answers commands nobody registered, pointing at `/help`.
pub struct UnknownCommandHandler {
    commands: Vec<String>,
}

impl UnknownCommandHandler {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }
}

#[async_trait]
impl CommandHandler for UnknownCommandHandler {
    fn name(&self) -> &str {
        "unknown"
    }

    async fn execute(&self, message: &InboundMessage) -> AppResult<String> {
        let name = message.command.as_deref().unwrap_or_default();
        let known = self
            .commands
            .iter()
            .map(|c| format!("/{}", c))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "Unknown command /{}. Available commands: {}",
            name, known
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_returns_static_text() {
        let handler = StartHandler::new("Hello!");
        let reply = handler.execute(&InboundMessage::new(1, "/start")).await.unwrap();
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn test_unknown_lists_commands() {
        let handler = UnknownCommandHandler::new(vec!["start".into(), "weather".into()]);
        let reply = handler
            .execute(&InboundMessage::new(1, "/forecast tomorrow"))
            .await
            .unwrap();
        assert_eq!(
            reply,
            "Unknown command /forecast. Available commands: /start, /weather"
        );
    }
}
