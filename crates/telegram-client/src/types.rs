//! Telegram Bot API types.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// Incoming update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub date: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

/// `getUpdates` request body.
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: Vec<String>,
}

/// `sendMessage` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
}

/// `sendChatAction` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatActionRequest {
    pub chat_id: i64,
    pub action: ChatAction,
}

/// Presence signal shown to the user while a reply is being produced.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
}

/// Parsed message for bot processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the message arrived in; replies go back here.
    pub chat_id: i64,
    /// Sender user id, absent for channel posts.
    pub sender: Option<i64>,
    /// Raw message text.
    pub text: String,
    /// Command name without the leading slash or `@botname` suffix.
    pub command: Option<String>,
    /// Bot named in a `/command@botname` mention, if any.
    pub mention: Option<String>,
    /// Whitespace-separated words after the command.
    pub args: Vec<String>,
}

impl InboundMessage {
    /// Build an inbound message from chat id and raw text.
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        let text = text.into();
        let parsed = parse_command(&text);

        Self {
            chat_id,
            sender: None,
            command: parsed.as_ref().map(|c| c.name.clone()),
            mention: parsed.as_ref().and_then(|c| c.mention.clone()),
            args: parsed.map(|c| c.args).unwrap_or_default(),
            text,
        }
    }

    /// Extract a bot message from an update.
    ///
    /// Non-text updates and commands addressed to another bot are skipped.
    pub fn from_update(update: &Update, bot_username: Option<&str>) -> Option<Self> {
        let message = update.message.as_ref()?;
        let text = message.text.clone()?;

        let mut inbound = Self::new(message.chat.id, text);
        if !inbound.is_addressed_to(bot_username) {
            return None;
        }
        inbound.sender = message.from.as_ref().map(|u| u.id);
        Some(inbound)
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// Whether a `@mention` is absent or names `bot_username`.
    pub fn is_addressed_to(&self, bot_username: Option<&str>) -> bool {
        match (&self.mention, bot_username) {
            (None, _) => true,
            (Some(mention), Some(me)) => mention.eq_ignore_ascii_case(me.trim_start_matches('@')),
            (Some(_), None) => false,
        }
    }
}

struct ParsedCommand {
    name: String,
    mention: Option<String>,
    args: Vec<String>,
}

/// Split `/name@bot arg1 arg2` into its name, mention and arguments.
///
/// The name must follow the slash directly: `/ time` is plain text.
fn parse_command(text: &str) -> Option<ParsedCommand> {
    let rest = text.trim_start().strip_prefix('/')?;
    if rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let (name, mention) = match head.split_once('@') {
        Some((name, bot)) => (name, Some(bot).filter(|b| !b.is_empty())),
        None => (head, None),
    };
    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        name: name.to_lowercase(),
        mention: mention.map(str::to_string),
        args: parts.map(str::to_string).collect(),
    })
}

/// Reply destined for a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub text: String,
}

impl OutboundReply {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}
