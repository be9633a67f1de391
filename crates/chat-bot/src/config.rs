//! Application configuration loaded from environment variables.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Bot behaviour configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Weather upstream configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Chat-completion upstream configuration
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Which handler answers free-form text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Random 10-digit number.
    #[default]
    Digits,
    /// Current weather at the configured location.
    Weather,
    /// Relay to the chat-completion API.
    Assistant,
    /// Server clock readout.
    Clock,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Variant::Digits => "digits",
            Variant::Weather => "weather",
            Variant::Assistant => "assistant",
            Variant::Clock => "clock",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token (also read from `BOT_TOKEN`)
    #[serde(default)]
    pub bot_token: String,

    /// Bot API base URL
    #[serde(default = "default_telegram_url")]
    pub api_url: String,

    /// Long-poll timeout for `getUpdates`
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub poll_timeout: Duration,

    /// Timeout for send requests
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Free-text handler selection
    #[serde(default)]
    pub variant: Variant,

    /// Optional text placed before generated digits
    #[serde(default)]
    pub digit_prefix: Option<String>,

    /// Upper bound on the "typing" presence call
    #[serde(default = "default_typing_timeout", with = "humantime_serde")]
    pub typing_timeout: Duration,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// wttr.in base URL
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// Location reported by the weather handler
    #[serde(default = "default_location")]
    pub location: String,

    /// Request timeout
    #[serde(default = "default_weather_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// API key (also read from `OPENAI_API_KEY`); required by the assistant variant
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout
    #[serde(default = "default_completion_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Maximum tokens in a generated reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// System instruction sent with every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

// Default implementations
impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_url: default_telegram_url(),
            poll_timeout: default_poll_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            digit_prefix: None,
            typing_timeout: default_typing_timeout(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            location: default_location(),
            timeout: default_weather_timeout(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_url(),
            model: default_model(),
            timeout: default_completion_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

// Default value functions
fn default_telegram_url() -> String {
    "https://api.telegram.org".into()
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_typing_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_weather_url() -> String {
    "https://wttr.in".into()
}

fn default_location() -> String {
    "Moscow".into()
}

fn default_weather_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

fn default_completion_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_prompt() -> String {
    "You are a helpful, concise and friendly assistant.".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map.
    ///
    /// Nested keys use `__` (`WEATHER__LOCATION`). The bare `BOT_TOKEN` and
    /// `OPENAI_API_KEY` variables act as defaults for the nested keys.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(token) = vars.get("BOT_TOKEN") {
            builder = builder.set_default("telegram.bot_token", token.as_str())?;
        }
        if let Some(key) = vars.get("OPENAI_API_KEY") {
            builder = builder.set_default("completion.api_key", key.as_str())?;
        }

        let config: Config = builder
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false)
                    .source(Some(vars)),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot start.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            bail!("BOT_TOKEN environment variable is required");
        }

        if self.bot.variant == Variant::Assistant && self.completion_api_key().is_none() {
            bail!("OPENAI_API_KEY environment variable is required for the assistant variant");
        }

        if self.weather.location.trim().is_empty() {
            bail!("WEATHER__LOCATION must not be empty");
        }

        Ok(())
    }

    /// Non-empty completion API key, if configured.
    pub fn completion_api_key(&self) -> Option<&str> {
        self.completion
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
