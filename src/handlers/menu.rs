//! Main menu
//!
//! Menu commands arrive as plain text from the reply keyboard, so a command
//! is recognized by its label in any loaded language.

use async_trait::async_trait;
use tracing::debug;

use crate::i18n::{params, I18n};
use crate::state::Step;
use crate::transport::keyboards::{cancel_keyboard, main_menu_keyboard, source_keyboard, tokens};
use crate::utils::errors::Result;
use crate::utils::helpers::format_timestamp;
use crate::utils::logging::log_user_action;
use super::common::{HandlerContext, StepHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Add,
    Edit,
    Delete,
    Plan,
    Random,
    Refresh,
    Source,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 7] = [
        MenuCommand::Add,
        MenuCommand::Edit,
        MenuCommand::Delete,
        MenuCommand::Plan,
        MenuCommand::Random,
        MenuCommand::Refresh,
        MenuCommand::Source,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            MenuCommand::Add => "menu.add",
            MenuCommand::Edit => "menu.edit",
            MenuCommand::Delete => "menu.delete",
            MenuCommand::Plan => "menu.plan",
            MenuCommand::Random => "menu.random",
            MenuCommand::Refresh => "menu.refresh",
            MenuCommand::Source => "menu.source",
        }
    }

    /// Match a typed label against every language
    pub fn parse(i18n: &I18n, text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        Self::ALL.into_iter().find(|command| {
            i18n.all_variants(command.label_key())
                .iter()
                .any(|label| label.to_lowercase() == text)
        })
    }
}

pub struct MenuHandler;

#[async_trait]
impl StepHandler for MenuHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        let Some(command) = MenuCommand::parse(cx.i18n, text) else {
            debug!(user_id = cx.user_id(), text = %text, "Unknown menu command");
            cx.send_with(&cx.t("menu.unknown_command"), main_menu_keyboard(cx.i18n, cx.lang()))
                .await;
            return Ok(());
        };

        log_user_action(cx.user_id(), "menu", Some(command.label_key()));

        if command != MenuCommand::Source {
            cx.backend()?;
        }

        match command {
            MenuCommand::Add => {
                cx.go(Step::AddingName)?;
                cx.send_with(&cx.t("adding.enter_title"), cancel_keyboard(cx.i18n, cx.lang()))
                    .await;
            }
            MenuCommand::Edit => {
                if cx.show_entry_choice("editing.choose", tokens::EDIT).await? {
                    cx.go(Step::EditingSelect)?;
                }
            }
            MenuCommand::Delete => {
                if cx.show_entry_choice("deleting.choose", tokens::DELETE).await? {
                    cx.go(Step::DeletingSelect)?;
                }
            }
            MenuCommand::Plan => {
                if cx.show_entry_choice("planning.choose", tokens::PLAN).await? {
                    cx.go(Step::PlanningSelect)?;
                }
            }
            MenuCommand::Random => {
                let backend = cx.backend()?;
                match backend.catalog.pick_random().await? {
                    Some(entry) => {
                        let mut values = cx.entry_params(&entry);
                        let last_played = match entry.last_played {
                            Some(ts) => format_timestamp(ts),
                            None => cx.t("random.never_played"),
                        };
                        values.insert("last_played".to_string(), last_played);
                        cx.send(&cx.tp("random.result", &values)).await
                    }
                    None => cx.send(&cx.t("random.empty")).await,
                }
            }
            MenuCommand::Refresh => {
                let backend = cx.backend()?;
                let changed = backend.catalog.refresh_all_statuses().await?;
                cx.send(&cx.tp("refresh.done", &params([("count", changed.to_string())])))
                    .await;
                cx.show_main_menu().await?;
            }
            MenuCommand::Source => {
                let keyboard = source_keyboard(cx.i18n, cx.lang(), cx.backends.current().is_some());
                cx.go(Step::ChoosingSource)?;
                cx.send_with(&cx.t("source.prompt"), keyboard).await;
            }
        }
        Ok(())
    }
}
