//! Chat command - relays free text to the chat-completion API.

use crate::commands::CommandHandler;
use crate::dispatch::ReplySink;
use crate::error::AppResult;
use crate::services::{CompletionPrompt, ServiceRequest, SharedCompletionClient, Upstream};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use telegram_client::InboundMessage;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

pub const FAILURE_REPLY: &str =
    "Sorry, I couldn't get a response right now. Please try again later.";

/// Sampling and length settings for each completion.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub typing_timeout: Duration,
}

pub struct ChatHandler {
    completion: SharedCompletionClient,
    sink: Arc<dyn ReplySink>,
    settings: ChatSettings,
}

impl ChatHandler {
    pub fn new(
        completion: SharedCompletionClient,
        sink: Arc<dyn ReplySink>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            completion,
            sink,
            settings,
        }
    }

    /// Best-effort "typing" indicator; failures and slowness are ignored.
    async fn signal_typing(&self, chat_id: i64) {
        match timeout(self.settings.typing_timeout, self.sink.send_typing(chat_id)).await {
            Ok(Ok(())) => debug!("Typing indicator sent"),
            Ok(Err(e)) => warn!("Failed to send typing indicator: {}", e),
            Err(_) => warn!("Typing indicator timed out"),
        }
    }
}

#[async_trait]
impl CommandHandler for ChatHandler {
    fn name(&self) -> &str {
        "chat"
    }

    #[instrument(skip(self, message), fields(chat = message.chat_id))]
    async fn execute(&self, message: &InboundMessage) -> AppResult<String> {
        info!(
            "Chat from {}: {}...",
            message.chat_id,
            message.text.chars().take(50).collect::<String>()
        );

        self.signal_typing(message.chat_id).await;

        let request = ServiceRequest::new(
            Upstream::ChatCompletion,
            CompletionPrompt {
                system: self.settings.system_prompt.clone(),
                user: message.text.clone(),
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            },
            self.settings.request_timeout,
        );

        match self.completion.call(request).await {
            Ok(text) => {
                info!("Response to {}: {} chars", message.chat_id, text.len());
                Ok(text)
            }
            Err(failure) => {
                error!(kind = ?failure.kind, "Completion failed: {}", failure.detail);
                Ok(FAILURE_REPLY.into())
            }
        }
    }
}
