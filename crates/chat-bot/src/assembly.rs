//! Wires the handler set for the configured variant.

use crate::commands::{
    ChatHandler, ChatSettings, ClockHandler, CommandHandler, DigitsHandler, WeatherHandler,
};
use crate::config::{Config, Variant};
use crate::dispatch::ReplySink;
use crate::error::{AppError, AppResult};
use crate::router::CommandRouter;
use crate::services::{SharedCompletionClient, SharedWeatherClient};
use std::sync::Arc;

const INTRO: &str = "Hello! I can do the following:";

/// Upstream clients and transport the handlers are built from.
pub struct Dependencies {
    pub weather: SharedWeatherClient,
    pub completion: Option<SharedCompletionClient>,
    pub sink: Arc<dyn ReplySink>,
}

/// Build the router for `config.bot.variant`.
///
/// `/weather`, `/random` and `/time` are available in every variant; the
/// variant only decides who answers plain text.
pub fn build_router(config: &Config, deps: Dependencies) -> AppResult<CommandRouter> {
    let location = config.weather.location.clone();

    let digits: Arc<dyn CommandHandler> =
        Arc::new(DigitsHandler::new(config.bot.digit_prefix.clone()));
    let clock: Arc<dyn CommandHandler> = Arc::new(ClockHandler::new());
    let weather: Arc<dyn CommandHandler> = Arc::new(WeatherHandler::new(
        deps.weather,
        location.as_str(),
        config.weather.timeout,
    ));

    let (fallback, free_text) = match config.bot.variant {
        Variant::Digits => (digits.clone(), "Get a random 10-digit number".to_string()),
        Variant::Weather => (weather.clone(), format!("Get current weather in {}", location)),
        Variant::Clock => (clock.clone(), "Get the current server time".to_string()),
        Variant::Assistant => {
            let completion = deps.completion.ok_or_else(|| {
                AppError::Config(anyhow::anyhow!(
                    "assistant variant requires a chat-completion client"
                ))
            })?;
            let chat: Arc<dyn CommandHandler> = Arc::new(ChatHandler::new(
                completion,
                deps.sink,
                ChatSettings {
                    system_prompt: config.completion.system_prompt.clone(),
                    max_tokens: config.completion.max_tokens,
                    temperature: config.completion.temperature,
                    request_timeout: config.completion.timeout,
                    typing_timeout: config.bot.typing_timeout,
                },
            ));
            (chat, "Chat with an AI assistant".to_string())
        }
    };

    Ok(CommandRouter::builder(fallback)
        .intro(INTRO)
        .free_text(free_text)
        .command(
            "weather",
            format!("Get current weather in {}", location),
            weather,
        )
        .command("random", "Get a random 10-digit number", digits)
        .command("time", "Get the current server time", clock)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MockReplySink;
    use crate::services::{
        CompletionPrompt, ServiceClient, ServiceRequest, ServiceResult, WeatherQuery,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use telegram_client::InboundMessage;
    use weather_client::CurrentConditions;

    struct NoWeather;

    #[async_trait]
    impl ServiceClient for NoWeather {
        type Params = WeatherQuery;
        type Output = CurrentConditions;

        async fn call(&self, _request: ServiceRequest<WeatherQuery>) -> ServiceResult<CurrentConditions> {
            Err(crate::services::ServiceFailure::transport("offline"))
        }
    }

    struct Echo;

    #[async_trait]
    impl ServiceClient for Echo {
        type Params = CompletionPrompt;
        type Output = String;

        async fn call(&self, request: ServiceRequest<CompletionPrompt>) -> ServiceResult<String> {
            Ok(request.params.user)
        }
    }

    fn config(variant: &str) -> Config {
        let vars: HashMap<String, String> = [
            ("BOT_TOKEN", "123:abc"),
            ("BOT__VARIANT", variant),
            ("OPENAI_API_KEY", "sk-test"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Config::from_vars(vars).unwrap()
    }

    fn deps(with_completion: bool) -> Dependencies {
        let mut sink = MockReplySink::new();
        sink.expect_send_typing().returning(|_| Ok(()));
        Dependencies {
            weather: Arc::new(NoWeather),
            completion: with_completion.then(|| Arc::new(Echo) as SharedCompletionClient),
            sink: Arc::new(sink),
        }
    }

    #[test]
    fn test_each_variant_picks_its_fallback() {
        for (variant, expected) in [
            ("digits", "digits"),
            ("weather", "weather"),
            ("clock", "clock"),
            ("assistant", "chat"),
        ] {
            let router = build_router(&config(variant), deps(true)).unwrap();
            let handler = router.route(&InboundMessage::new(1, "hello"));
            assert_eq!(handler.name(), expected, "variant {}", variant);
        }
    }

    #[test]
    fn test_weather_command_in_every_variant() {
        for variant in ["digits", "weather", "clock", "assistant"] {
            let router = build_router(&config(variant), deps(true)).unwrap();
            let handler = router.route(&InboundMessage::new(1, "/weather"));
            assert_eq!(handler.name(), "weather");
        }
    }

    #[test]
    fn test_assistant_without_client_fails() {
        let result = build_router(&config("assistant"), deps(false));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_start_text_for_digits_variant() {
        let router = build_router(&config("digits"), deps(false)).unwrap();
        let message = InboundMessage::new(1, "/start");
        let text = router.route(&message).execute(&message).await.unwrap();

        assert!(text.starts_with(
            "Hello! I can do the following:\n\
             • Send any message → Get a random 10-digit number\n\
             • /weather → Get current weather in Moscow"
        ));
    }

    #[tokio::test]
    async fn test_assistant_relays_text() {
        let router = build_router(&config("assistant"), deps(true)).unwrap();
        let message = InboundMessage::new(1, "what is rust?");
        let text = router.route(&message).execute(&message).await.unwrap();
        assert_eq!(text, "what is rust?");
    }
}
