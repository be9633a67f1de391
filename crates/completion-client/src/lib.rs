//! Client for OpenAI-compatible chat-completion APIs.

mod client;
mod error;
mod types;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use types::*;
