//! Common test utilities for integration tests.

use chat_bot::config::Config;
use std::collections::HashMap;
use telegram_client::TelegramClient;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "123:test";

/// Telegram client pointed at a mock server.
pub fn test_telegram_client(mock_server: &MockServer) -> TelegramClient {
    TelegramClient::new(mock_server.uri(), TOKEN, Duration::from_secs(5)).unwrap()
}

/// Configuration for `variant` with all upstreams on mock servers.
pub fn test_config(variant: &str, weather: &MockServer, completion: &MockServer) -> Config {
    let vars: HashMap<String, String> = [
        ("BOT_TOKEN", TOKEN.to_string()),
        ("BOT__VARIANT", variant.to_string()),
        ("WEATHER__BASE_URL", weather.uri()),
        ("WEATHER__TIMEOUT", "500ms".to_string()),
        ("COMPLETION__BASE_URL", completion.uri()),
        ("COMPLETION__API_KEY", "test-api-key".to_string()),
        ("COMPLETION__TIMEOUT", "500ms".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    Config::from_vars(vars).unwrap()
}

/// Accept `sendMessage` calls, expecting exactly `times` of them.
pub async fn expect_send_message(telegram: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {
                "message_id": 1,
                "date": 1700000000,
                "chat": { "id": 1, "type": "private" }
            }
        })))
        .expect(times)
        .mount(telegram)
        .await;
}

/// Accept `sendChatAction` calls.
pub async fn accept_chat_action(telegram: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendChatAction", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": true
        })))
        .mount(telegram)
        .await;
}

/// Texts of every `sendMessage` request the mock received.
pub async fn sent_texts(telegram: &MockServer) -> Vec<String> {
    telegram
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().ends_with("/sendMessage"))
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["text"].as_str().unwrap().to_string()
        })
        .collect()
}
