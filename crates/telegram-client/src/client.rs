//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Extra slack on top of the long-poll timeout before the HTTP request is abandoned.
const LONG_POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
///
/// The bot token is part of every request path, so it is kept in a
/// `SecretString` and stripped from transport errors.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: SecretString,
}

impl TelegramClient {
    /// Create a new Telegram client.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token.expose_secret(), method)
    }

    /// Identity of the bot owning the token.
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        let response = self.client.get(self.method_url("getMe")).send().await?;
        self.handle_response(response).await
    }

    /// Check that the token is accepted by the API.
    pub async fn health_check(&self) -> bool {
        self.get_me().await.is_ok()
    }

    /// Long-poll for updates newer than `offset`.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message".into()],
        };

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs) + LONG_POLL_GRACE)
            .json(&request)
            .send()
            .await?;

        let updates: Vec<Update> = self.handle_response(response).await?;
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }

    /// Send a text message to a chat.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
        };

        self.post::<_, serde_json::Value>("sendMessage", &request)
            .await
            .map(|_| ())
            .inspect_err(|e| warn!("Send failed: {}", e))?;

        debug!("Sent message to {}", chat_id);
        Ok(())
    }

    /// Show a presence indicator such as "typing..." in a chat.
    #[instrument(skip(self))]
    pub async fn send_chat_action(
        &self,
        chat_id: i64,
        action: ChatAction,
    ) -> Result<(), TelegramError> {
        let request = ChatActionRequest { chat_id, action };
        self.post::<_, bool>("sendChatAction", &request).await?;
        Ok(())
    }

    /// Deliver an outbound reply.
    pub async fn reply(&self, reply: &OutboundReply) -> Result<(), TelegramError> {
        self.send_message(reply.chat_id, &reply.text).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Unwrap the `{ok, result, description}` envelope.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, TelegramError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(TelegramError::Unauthorized);
        }

        let body = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                TelegramError::Json(e)
            } else {
                TelegramError::Api {
                    status: status.as_u16(),
                    description: body.chars().take(200).collect(),
                }
            }
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "Unknown error".into()),
            }),
        }
    }
}
