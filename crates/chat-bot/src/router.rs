//! Command router: picks the handler for an inbound message.

use crate::commands::{CommandHandler, StartHandler, UnknownCommandHandler};
use std::collections::HashMap;
use std::sync::Arc;
use telegram_client::InboundMessage;

struct Registration {
    name: String,
    description: String,
    handler: Arc<dyn CommandHandler>,
}

/// Maps command names to handlers, with a fallback for free text.
pub struct CommandRouter {
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    names: Vec<String>,
    fallback: Arc<dyn CommandHandler>,
    unknown: Arc<dyn CommandHandler>,
}

impl CommandRouter {
    /// Start building a router whose free-text handler is `fallback`.
    pub fn builder(fallback: Arc<dyn CommandHandler>) -> RouterBuilder {
        RouterBuilder {
            fallback,
            intro: None,
            free_text: None,
            registrations: Vec::new(),
        }
    }

    /// Select the handler for a message. Selection has no side effects.
    pub fn route(&self, message: &InboundMessage) -> Arc<dyn CommandHandler> {
        match message.command.as_deref() {
            Some(name) => self
                .commands
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.unknown.clone()),
            None => self.fallback.clone(),
        }
    }

    /// Registered command names in registration order.
    pub fn command_names(&self) -> &[String] {
        &self.names
    }
}

pub struct RouterBuilder {
    fallback: Arc<dyn CommandHandler>,
    intro: Option<String>,
    free_text: Option<String>,
    registrations: Vec<Registration>,
}

impl RouterBuilder {
    /// Register `/start` and `/help` answering with `intro` followed by the
    /// command list.
    pub fn intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Describe what plain messages do, for the `/start` text.
    pub fn free_text(mut self, description: impl Into<String>) -> Self {
        self.free_text = Some(description.into());
        self
    }

    /// Register a command. Names are matched case-insensitively without the slash.
    pub fn command(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        self.registrations.push(Registration {
            name: name.into().trim_start_matches('/').to_lowercase(),
            description: description.into(),
            handler,
        });
        self
    }

    fn capabilities(&self, intro: &str) -> String {
        let mut lines = vec![intro.to_string()];
        if let Some(free_text) = &self.free_text {
            lines.push(format!("• Send any message → {}", free_text));
        }
        for registration in &self.registrations {
            lines.push(format!(
                "• /{} → {}",
                registration.name, registration.description
            ));
        }
        lines.join("\n")
    }

    pub fn build(mut self) -> CommandRouter {
        if let Some(intro) = self.intro.take() {
            let start: Arc<dyn CommandHandler> = Arc::new(StartHandler::new(self.capabilities(&intro)));
            let help_registered = self.registrations.iter().any(|r| r.name == "help");

            self.registrations.insert(
                0,
                Registration {
                    name: "start".into(),
                    description: "Show what this bot can do".into(),
                    handler: start.clone(),
                },
            );
            if !help_registered {
                self.registrations.insert(
                    1,
                    Registration {
                        name: "help".into(),
                        description: "Show what this bot can do".into(),
                        handler: start,
                    },
                );
            }
        }

        let mut commands = HashMap::new();
        let mut names = Vec::new();
        for registration in self.registrations {
            if commands
                .insert(registration.name.clone(), registration.handler)
                .is_none()
            {
                names.push(registration.name);
            }
        }

        CommandRouter {
            commands,
            unknown: Arc::new(UnknownCommandHandler::new(names.clone())),
            names,
            fallback: self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ClockHandler, DigitsHandler};

    fn router() -> CommandRouter {
        CommandRouter::builder(Arc::new(DigitsHandler::default()))
            .intro("Hello! I can do the following:")
            .free_text("Get a random 10-digit number")
            .command("time", "Current server time", Arc::new(ClockHandler::new()))
            .build()
    }

    #[test]
    fn test_plain_text_goes_to_fallback() {
        let handler = router().route(&InboundMessage::new(1, "hello"));
        assert_eq!(handler.name(), "digits");
    }

    #[test]
    fn test_registered_command_is_selected() {
        let handler = router().route(&InboundMessage::new(1, "/time"));
        assert_eq!(handler.name(), "clock");
        let handler = router().route(&InboundMessage::new(1, "/TIME@some_bot"));
        assert_eq!(handler.name(), "clock");
    }

    #[test]
    fn test_start_and_help_are_registered() {
        let router = router();
        assert_eq!(router.command_names(), &["start", "help", "time"]);
        assert_eq!(router.route(&InboundMessage::new(1, "/help")).name(), "start");
    }

    #[test]
    fn test_unregistered_command_is_answered() {
        let handler = router().route(&InboundMessage::new(1, "/nope"));
        assert_eq!(handler.name(), "unknown");
    }

    #[tokio::test]
    async fn test_start_lists_capabilities() {
        let router = router();
        let text = router
            .route(&InboundMessage::new(1, "/start"))
            .execute(&InboundMessage::new(1, "/start"))
            .await
            .unwrap();

        assert_eq!(
            text,
            "Hello! I can do the following:\n\
             • Send any message → Get a random 10-digit number\n\
             • /time → Current server time"
        );
    }

    #[test]
    fn test_without_intro_start_is_unknown() {
        let router = CommandRouter::builder(Arc::new(DigitsHandler::default())).build();
        assert!(router.command_names().is_empty());
        assert_eq!(router.route(&InboundMessage::new(1, "/start")).name(), "unknown");
    }
}
