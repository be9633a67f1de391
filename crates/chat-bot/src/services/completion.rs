//! Chat-completion upstream adapter.

use super::{bounded, ServiceClient, ServiceFailure, ServiceRequest, ServiceResult};
use async_trait::async_trait;
use completion_client::{CompletionClient, CompletionError, Message};
use tracing::instrument;

/// One single-turn completion: system instruction plus the user's text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Completions backed by an OpenAI-compatible API.
pub struct CompletionUpstream {
    client: CompletionClient,
}

impl CompletionUpstream {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServiceClient for CompletionUpstream {
    type Params = CompletionPrompt;
    type Output = String;

    #[instrument(skip(self, request), fields(model = %self.client.model()))]
    async fn call(&self, request: ServiceRequest<CompletionPrompt>) -> ServiceResult<String> {
        let ServiceRequest {
            upstream,
            params,
            timeout,
        } = request;

        let messages = vec![Message::system(params.system), Message::user(params.user)];
        bounded(
            upstream,
            timeout,
            self.client
                .chat(messages, Some(params.temperature), Some(params.max_tokens)),
        )
        .await
    }
}

impl From<CompletionError> for ServiceFailure {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Timeout => ServiceFailure::timeout(err.to_string()),
            CompletionError::Http(ref e) if e.is_builder() => {
                ServiceFailure::unknown(err.to_string())
            }
            CompletionError::Http(_)
            | CompletionError::RateLimit
            | CompletionError::Unauthorized
            | CompletionError::Api { .. } => ServiceFailure::transport(err.to_string()),
            CompletionError::Json(_) | CompletionError::EmptyResponse => {
                ServiceFailure::malformed(err.to_string())
            }
        }
    }
}
