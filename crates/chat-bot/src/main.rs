//! Telegram bot - main entry point.

use anyhow::Context;
use chat_bot::assembly::{build_router, Dependencies};
use chat_bot::config::{Config, Variant};
use chat_bot::dispatch::Dispatcher;
use chat_bot::error::AppResult;
use chat_bot::services::{
    CompletionUpstream, SharedCompletionClient, SharedWeatherClient, WeatherUpstream,
};
use completion_client::CompletionClient;
use std::sync::Arc;
use telegram_client::{MessageReceiver, TelegramClient};
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weather_client::WeatherClient;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level, config.bot.log_json);

    info!("Starting bot (variant: {})...", config.bot.variant);

    // Initialize clients
    let telegram = TelegramClient::new(
        &config.telegram.api_url,
        &config.telegram.bot_token,
        config.telegram.request_timeout,
    )
    .context("Failed to create Telegram client")?;

    let weather: SharedWeatherClient = Arc::new(WeatherUpstream::new(
        WeatherClient::new(&config.weather.base_url, config.weather.timeout)
            .context("Failed to create weather client")?,
    ));

    let completion: Option<SharedCompletionClient> = match config.completion_api_key() {
        Some(api_key) => {
            let client = CompletionClient::new(
                api_key,
                &config.completion.base_url,
                &config.completion.model,
                config.completion.timeout,
            )
            .context("Failed to create chat-completion client")?;

            if config.bot.variant == Variant::Assistant {
                if client.health_check().await {
                    info!("Chat-completion API healthy - Model: {}", client.model());
                } else {
                    warn!("Chat-completion health check failed - will retry on requests");
                }
            }

            Some(Arc::new(CompletionUpstream::new(client)))
        }
        None => None,
    };

    // Health check
    let me = match telegram.get_me().await {
        Ok(me) => {
            info!(
                "Telegram API healthy - Bot: @{}",
                me.username.as_deref().unwrap_or(&me.first_name)
            );
            me
        }
        Err(e) => {
            error!("Telegram API check failed: {}", e);
            return Err(e.into());
        }
    };

    // Create command handlers
    let router = build_router(
        &config,
        Dependencies {
            weather,
            completion,
            sink: Arc::new(telegram.clone()),
        },
    )?;

    info!(
        "Registered commands: /{}",
        router.command_names().join(", /")
    );

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(router), Arc::new(telegram.clone())));

    info!("Listening for messages...");

    // Start message receiver
    let mut receiver = MessageReceiver::new(telegram, config.telegram.poll_timeout);
    if let Some(username) = me.username {
        receiver = receiver.with_bot_username(username);
    }
    let mut stream = Box::pin(receiver.stream());

    // Main message loop: one task per message
    loop {
        tokio::select! {
            Some(message) = stream.next() => {
                dispatcher.spawn(message);
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
