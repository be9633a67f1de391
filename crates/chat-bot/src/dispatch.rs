//! Per-message dispatch with an isolated error boundary.

use crate::error::AppResult;
use crate::router::CommandRouter;
use async_trait::async_trait;
use std::sync::Arc;
use telegram_client::{ChatAction, InboundMessage, OutboundReply, TelegramClient};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Reply used when a handler fails or panics.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Outbound half of the messaging transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Transmit a reply.
    async fn send_reply(&self, reply: &OutboundReply) -> AppResult<()>;

    /// Show the "typing" presence indicator in a chat.
    async fn send_typing(&self, chat_id: i64) -> AppResult<()>;
}

#[async_trait]
impl ReplySink for TelegramClient {
    async fn send_reply(&self, reply: &OutboundReply) -> AppResult<()> {
        Ok(self.reply(reply).await?)
    }

    async fn send_typing(&self, chat_id: i64) -> AppResult<()> {
        Ok(self.send_chat_action(chat_id, ChatAction::Typing).await?)
    }
}

/// Routes each message, runs its handler and sends exactly one reply.
pub struct Dispatcher {
    router: Arc<CommandRouter>,
    sink: Arc<dyn ReplySink>,
}

impl Dispatcher {
    pub fn new(router: Arc<CommandRouter>, sink: Arc<dyn ReplySink>) -> Self {
        Self { router, sink }
    }

    /// Produce the reply for a message without sending it.
    ///
    /// The handler runs in its own task: an error or a panic inside it turns
    /// into [`FALLBACK_REPLY`] instead of escaping.
    pub async fn reply_for(&self, message: InboundMessage) -> OutboundReply {
        let chat_id = message.chat_id;
        let router = self.router.clone();

        let task = tokio::spawn(async move {
            let handler = router.route(&message);
            let result = handler.execute(&message).await;
            (handler.name().to_string(), result)
        });

        match task.await {
            Ok((_, Ok(text))) => OutboundReply::new(chat_id, text),
            Ok((handler, Err(e))) => {
                error!(%handler, "Handler error: {}", e);
                OutboundReply::new(chat_id, FALLBACK_REPLY)
            }
            Err(e) => {
                error!("Handler task failed: {}", e);
                OutboundReply::new(chat_id, FALLBACK_REPLY)
            }
        }
    }

    /// Handle one message end to end. Send failures are logged, not returned.
    #[instrument(skip(self, message), fields(chat = message.chat_id, command = ?message.command))]
    pub async fn handle(&self, message: InboundMessage) -> OutboundReply {
        let reply = self.reply_for(message).await;

        if let Err(e) = self.sink.send_reply(&reply).await {
            error!("Failed to send reply: {}", e);
        } else {
            info!("Replied with {} chars", reply.text.len());
        }

        reply
    }

    /// Handle a message on its own task.
    pub fn spawn(self: &Arc<Self>, message: InboundMessage) -> JoinHandle<OutboundReply> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.handle(message).await })
    }
}
