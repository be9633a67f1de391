//! Telegram bot answering commands and free text with digits, weather,
//! an AI assistant or the server clock.

pub mod assembly;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod router;
pub mod services;
