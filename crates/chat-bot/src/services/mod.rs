//! Bounded single-attempt calls to external upstreams.
//!
//! Every call resolves to a [`ServiceResult`]: either the decoded payload or a
//! [`ServiceFailure`] whose [`FailureKind`] handlers match on exhaustively.

mod completion;
mod weather;

pub use completion::{CompletionPrompt, CompletionUpstream};
pub use weather::{WeatherQuery, WeatherUpstream};

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use weather_client::CurrentConditions;

/// Upstream a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Weather,
    ChatCompletion,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Weather => f.write_str("weather"),
            Upstream::ChatCompletion => f.write_str("chat-completion"),
        }
    }
}

/// One request to one upstream, consumed by a single call.
#[derive(Debug, Clone)]
pub struct ServiceRequest<P> {
    pub upstream: Upstream,
    pub params: P,
    pub timeout: Duration,
}

impl<P> ServiceRequest<P> {
    pub fn new(upstream: Upstream, params: P, timeout: Duration) -> Self {
        Self {
            upstream,
            params,
            timeout,
        }
    }
}

/// Classified reason a call did not produce a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No answer within the request timeout.
    Timeout,
    /// Non-2xx status or connection failure.
    TransportError,
    /// Answer received but not in the expected shape.
    MalformedResponse,
    /// Anything else.
    Unknown,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {detail}")]
pub struct ServiceFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl ServiceFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, detail)
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::TransportError, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, detail)
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Unknown, detail)
    }
}

/// Outcome of exactly one upstream call.
pub type ServiceResult<T> = Result<T, ServiceFailure>;

/// A client performing one bounded request against one upstream.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    type Params: Send + 'static;
    type Output: Send;

    /// Single attempt, no retry, no caching.
    async fn call(&self, request: ServiceRequest<Self::Params>) -> ServiceResult<Self::Output>;
}

/// Weather lookup as handlers see it.
pub type SharedWeatherClient =
    Arc<dyn ServiceClient<Params = WeatherQuery, Output = CurrentConditions>>;

/// Chat completion as handlers see it.
pub type SharedCompletionClient = Arc<dyn ServiceClient<Params = CompletionPrompt, Output = String>>;

/// Run an upstream call under `limit`, classifying client errors.
pub(crate) async fn bounded<T, E, F>(upstream: Upstream, limit: Duration, call: F) -> ServiceResult<T>
where
    F: Future<Output = Result<T, E>>,
    ServiceFailure: From<E>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            let failure = ServiceFailure::from(e);
            warn!(%upstream, kind = ?failure.kind, detail = %failure.detail, "Upstream call failed");
            Err(failure)
        }
        Err(_) => {
            warn!(%upstream, ?limit, "Upstream call timed out");
            Err(ServiceFailure::timeout(format!(
                "{} did not answer within {:?}",
                upstream, limit
            )))
        }
    }
}
