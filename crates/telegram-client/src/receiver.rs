//! Update receiver with long polling.

use crate::client::TelegramClient;
use crate::types::*;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Message receiver that long-polls `getUpdates`.
pub struct MessageReceiver {
    client: TelegramClient,
    poll_timeout_secs: u64,
    bot_username: Option<String>,
}

impl MessageReceiver {
    /// Create a new message receiver.
    pub fn new(client: TelegramClient, poll_timeout: Duration) -> Self {
        Self {
            client,
            poll_timeout_secs: poll_timeout.as_secs(),
            bot_username: None,
        }
    }

    /// Only accept `/command@name` mentions that name this bot.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Start receiving text messages as an async stream.
    ///
    /// Each poll acknowledges everything up to the last seen `update_id`.
    pub fn stream(self) -> impl Stream<Item = InboundMessage> {
        async_stream::stream! {
            let mut offset: Option<i64> = None;

            loop {
                match self.client.get_updates(offset, self.poll_timeout_secs).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(update.update_id + 1);

                            let bot_username = self.bot_username.as_deref();
                            if let Some(message) = InboundMessage::from_update(&update, bot_username) {
                                debug!("Received: {} from chat {}",
                                    message.text.chars().take(50).collect::<String>(),
                                    message.chat_id
                                );
                                yield message;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Receive error: {}", e);
                        sleep(ERROR_BACKOFF).await;
                    }
                }
            }
        }
    }
}
