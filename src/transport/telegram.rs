//! Telegram implementation of the transport adapter

use async_trait::async_trait;
use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};
use tracing::{debug, warn};

use super::{InboundEvent, Keyboard, OptionButton, Transport};
use crate::utils::errors::Result;

/// Sends through the Bot API and answers callback queries.
///
/// Callback queries are parked until the engine acknowledges them, so the
/// engine only ever deals with string event ids.
pub struct TelegramTransport {
    bot: Bot,
    pending: DashMap<String, CallbackQuery>,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            pending: DashMap::new(),
        }
    }

    /// Build an inbound text event from a message, if it carries text
    pub fn text_event(msg: &Message) -> Option<InboundEvent> {
        let text = msg.text()?;
        let language = msg.from.as_ref().and_then(|u| u.language_code.clone());
        Some(InboundEvent::text(msg.chat.id.0, text).with_language(language))
    }

    /// Build an inbound selection event from a callback query and park the
    /// query until it is acknowledged
    pub fn selection_event(&self, query: CallbackQuery) -> Option<InboundEvent> {
        let token = query.data.clone()?;
        let user_id = query
            .message
            .as_ref()
            .map(|m| m.chat().id.0)
            .unwrap_or(query.from.id.0 as i64);
        let language = query.from.language_code.clone();
        let event_id = query.id.to_string();

        self.pending.insert(event_id.clone(), query);
        Some(InboundEvent::selection(user_id, event_id, token).with_language(language))
    }

    fn inline_markup(rows: Vec<Vec<OptionButton>>) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
            row.into_iter()
                .map(|b| InlineKeyboardButton::callback(b.label, b.token))
                .collect::<Vec<_>>()
        }))
    }

    fn reply_markup(rows: Vec<Vec<String>>) -> KeyboardMarkup {
        KeyboardMarkup::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
        )
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(user_id), text).await?;
        Ok(())
    }

    async fn send_with_options(&self, user_id: i64, text: &str, keyboard: Keyboard) -> Result<()> {
        match keyboard {
            Keyboard::Inline(rows) => {
                self.bot
                    .send_message(ChatId(user_id), text)
                    .reply_markup(Self::inline_markup(rows))
                    .await?;
            }
            Keyboard::Reply(rows) => {
                self.bot
                    .send_message(ChatId(user_id), text)
                    .reply_markup(Self::reply_markup(rows))
                    .await?;
            }
        }
        Ok(())
    }

    async fn acknowledge(&self, event_id: &str, text: &str, alert: bool) -> Result<()> {
        let Some((_, query)) = self.pending.remove(event_id) else {
            debug!(event_id = %event_id, "Callback query already acknowledged");
            return Ok(());
        };

        let mut request = self.bot.answer_callback_query(query.id.clone());
        if !text.is_empty() {
            request = request.text(text).show_alert(alert);
        }
        if let Err(e) = request.await {
            warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
            return Err(e.into());
        }
        Ok(())
    }
}
