//! Weather upstream adapter.

use super::{bounded, ServiceClient, ServiceFailure, ServiceRequest, ServiceResult};
use async_trait::async_trait;
use tracing::instrument;
use weather_client::{CurrentConditions, WeatherClient, WeatherError};

/// Parameters of a weather lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub location: String,
}

impl WeatherQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Weather lookups backed by wttr.in.
pub struct WeatherUpstream {
    client: WeatherClient,
}

impl WeatherUpstream {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServiceClient for WeatherUpstream {
    type Params = WeatherQuery;
    type Output = CurrentConditions;

    #[instrument(skip(self, request), fields(location = %request.params.location))]
    async fn call(&self, request: ServiceRequest<WeatherQuery>) -> ServiceResult<CurrentConditions> {
        let ServiceRequest {
            upstream,
            params,
            timeout,
        } = request;

        bounded(upstream, timeout, self.client.current(&params.location)).await
    }
}

impl From<WeatherError> for ServiceFailure {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Timeout => ServiceFailure::timeout(err.to_string()),
            WeatherError::Status { .. } => ServiceFailure::transport(err.to_string()),
            WeatherError::Http(ref e) if e.is_builder() => ServiceFailure::unknown(err.to_string()),
            WeatherError::Http(_) => ServiceFailure::transport(err.to_string()),
            WeatherError::Malformed(_) => ServiceFailure::malformed(err.to_string()),
            WeatherError::InvalidLocation(_) => ServiceFailure::unknown(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{FailureKind, Upstream};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstream(mock_server: &MockServer) -> WeatherUpstream {
        WeatherUpstream::new(WeatherClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap())
    }

    fn request(timeout: Duration) -> ServiceRequest<WeatherQuery> {
        ServiceRequest::new(Upstream::Weather, WeatherQuery::new("Moscow"), timeout)
    }

    #[tokio::test]
    async fn test_call_decodes_conditions() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/Moscow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current_condition": [{
                    "temp_C": "-3",
                    "FeelsLikeC": "-8",
                    "humidity": "91",
                    "weatherDesc": [{ "value": "Light snow" }],
                    "windspeedKmph": "14"
                }]
            })))
            .mount(&mock_server)
            .await;

        let conditions = upstream(&mock_server)
            .call(request(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(conditions.temp_c, -3);
        assert_eq!(conditions.description, "Light snow");
    }

    #[tokio::test]
    async fn test_request_timeout_is_enforced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let failure = upstream(&mock_server)
            .call(request(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_status_error_is_transport() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let failure = upstream(&mock_server)
            .call(request(Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::TransportError);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let client = WeatherClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let failure = WeatherUpstream::new(client)
            .call(request(Duration::from_secs(2)))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::TransportError);
    }

    #[tokio::test]
    async fn test_missing_fields_are_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": []
            })))
            .mount(&mock_server)
            .await;

        let failure = upstream(&mock_server)
            .call(request(Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::MalformedResponse);
    }

    #[test]
    fn test_invalid_location_is_unknown() {
        let failure = ServiceFailure::from(WeatherError::InvalidLocation("empty".into()));
        assert_eq!(failure.kind, FailureKind::Unknown);
    }
}
