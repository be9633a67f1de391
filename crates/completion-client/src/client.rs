//! Chat-completion HTTP client.

use crate::error::CompletionError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// OpenAI-compatible chat-completion client.
///
/// The API key is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl CompletionClient {
    /// Create a new client. `timeout` bounds every request.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
            model: model.into(),
        })
    }

    /// Get the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request. Single attempt, no retry.
    #[instrument(skip(self, messages), fields(message_count = messages.len(), model = %self.model))]
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let chat_response = self.handle_response::<ChatResponse>(response).await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }

    /// List available models.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<Model>, CompletionError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        self.handle_response::<ModelsResponse>(response)
            .await
            .map(|r| r.data)
    }

    /// Health check - returns true if API is reachable and the key is accepted.
    pub async fn health_check(&self) -> bool {
        self.list_models().await.is_ok()
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CompletionError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!("Response body: {}", body.chars().take(200).collect::<String>());
            serde_json::from_str(&body).map_err(CompletionError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response) -> CompletionError {
        let status = response.status();

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Rate limit exceeded");
                CompletionError::RateLimit
            }
            StatusCode::UNAUTHORIZED => {
                warn!("Authentication failed");
                CompletionError::Unauthorized
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".into());
                CompletionError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}
