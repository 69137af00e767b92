//! Transport adapter
//!
//! The conversation engine talks to the chat platform only through the
//! [`Transport`] trait and receives platform-neutral [`InboundEvent`]s.

pub mod keyboards;
pub mod telegram;

use async_trait::async_trait;

use crate::utils::errors::Result;

pub use telegram::TelegramTransport;

/// One button of an inline keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionButton {
    pub label: String,
    pub token: String,
}

impl OptionButton {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Options attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Buttons under the message; a press arrives as a selection event
    Inline(Vec<Vec<OptionButton>>),
    /// Persistent keyboard; a press arrives as plain text
    Reply(Vec<Vec<String>>),
}

impl Keyboard {
    /// All selection tokens of an inline keyboard
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Keyboard::Inline(rows) => rows.iter().flatten().map(|b| b.token.as_str()).collect(),
            Keyboard::Reply(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Free-text message
    Text(String),
    /// A button press identified by its token
    Selection { event_id: String, token: String },
}

impl EventKind {
    /// Short label for logs
    pub fn describe(&self) -> &str {
        match self {
            EventKind::Text(_) => "text",
            EventKind::Selection { token, .. } => token,
        }
    }
}

/// An inbound chat event, already stripped of platform details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: i64,
    pub language_code: Option<String>,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn text(user_id: i64, text: impl Into<String>) -> Self {
        Self {
            user_id,
            language_code: None,
            kind: EventKind::Text(text.into()),
        }
    }

    pub fn selection(user_id: i64, event_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id,
            language_code: None,
            kind: EventKind::Selection {
                event_id: event_id.into(),
                token: token.into(),
            },
        }
    }

    pub fn with_language(mut self, language_code: Option<String>) -> Self {
        self.language_code = language_code;
        self
    }
}

/// Outbound side of the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()>;

    async fn send_with_options(&self, user_id: i64, text: &str, keyboard: Keyboard) -> Result<()>;

    /// Answer a selection event. An empty `text` answers silently.
    async fn acknowledge(&self, event_id: &str, text: &str, alert: bool) -> Result<()>;
}
