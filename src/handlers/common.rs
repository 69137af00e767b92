//! Shared handler plumbing
//!
//! Every step handler receives a [`HandlerContext`]: the user's locked
//! conversation plus the services needed to answer. Outbound failures are
//! logged here and never reach the state machine.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::i18n::{params, I18n, TranslationParams};
use crate::models::Entry;
use crate::services::{Backend, BackendRegistry};
use crate::state::{ConversationContext, ScenarioManager, Step};
use crate::transport::keyboards::{
    category_label, entries_keyboard, main_menu_keyboard, render_catalog, status_label, tokens,
};
use crate::transport::{Keyboard, Transport};
use crate::utils::errors::{GameKeeperError, Result};
use super::fallback::FallbackHandler;

/// Everything a handler may touch while processing one event
pub struct HandlerContext<'a> {
    pub context: &'a mut ConversationContext,
    pub transport: &'a dyn Transport,
    pub i18n: &'a I18n,
    pub backends: &'a BackendRegistry,
    pub scenarios: &'a ScenarioManager,
    event_id: Option<String>,
    acknowledged: bool,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        context: &'a mut ConversationContext,
        transport: &'a dyn Transport,
        i18n: &'a I18n,
        backends: &'a BackendRegistry,
        scenarios: &'a ScenarioManager,
        event_id: Option<String>,
    ) -> Self {
        Self {
            context,
            transport,
            i18n,
            backends,
            scenarios,
            event_id,
            acknowledged: false,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.context.user_id
    }

    pub fn step(&self) -> Step {
        self.context.step
    }

    pub fn lang(&self) -> &str {
        &self.context.language
    }

    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key, self.lang(), None)
    }

    pub fn tp(&self, key: &str, params: &TranslationParams) -> String {
        self.i18n.t(key, self.lang(), Some(params))
    }

    pub async fn send(&self, text: &str) {
        if let Err(e) = self.transport.send_text(self.user_id(), text).await {
            warn!(user_id = self.user_id(), error = %e, "Failed to send message");
        }
    }

    pub async fn send_with(&self, text: &str, keyboard: Keyboard) {
        if let Err(e) = self.transport.send_with_options(self.user_id(), text, keyboard).await {
            warn!(user_id = self.user_id(), error = %e, "Failed to send message with keyboard");
        }
    }

    /// Answer the current selection event once. Later calls are no-ops.
    pub async fn acknowledge(&mut self, text: &str, alert: bool) {
        if self.acknowledged {
            return;
        }
        let Some(event_id) = self.event_id.as_deref() else {
            return;
        };
        self.acknowledged = true;
        if let Err(e) = self.transport.acknowledge(event_id, text, alert).await {
            warn!(user_id = self.user_id(), error = %e, "Failed to acknowledge selection");
        }
    }

    /// Silent acknowledgement for selections nobody answered explicitly
    pub async fn finish(&mut self) {
        self.acknowledge("", false).await;
    }

    pub async fn unsupported_selection(&mut self) {
        let text = self.t("errors.unsupported_action");
        self.acknowledge(&text, true).await;
    }

    pub async fn use_buttons(&self) {
        self.send(&self.t("errors.use_buttons")).await;
    }

    pub fn backend(&self) -> Result<Arc<Backend>> {
        self.backends.require_current()
    }

    pub fn go(&mut self, step: Step) -> Result<()> {
        self.scenarios.transition(&mut *self.context, step)
    }

    pub fn reset_to_menu(&mut self) {
        self.scenarios.reset_to_menu(&mut *self.context);
    }

    /// Staged text value, or `MissingData` if an earlier step never stored it
    pub fn staged_string(&self, key: &'static str) -> Result<String> {
        self.context.get_string(key).ok_or(GameKeeperError::MissingData(key))
    }

    pub fn staged_i32(&self, key: &'static str) -> Result<i32> {
        self.context
            .get_i64(key)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or(GameKeeperError::MissingData(key))
    }

    pub fn selected_id(&self) -> Result<i64> {
        self.context
            .selected_entry_id
            .ok_or(GameKeeperError::MissingData("selected entry"))
    }

    pub fn entry_params(&self, entry: &Entry) -> TranslationParams {
        params([
            ("title", entry.title.clone()),
            ("category", category_label(self.i18n, self.lang(), entry.category)),
            ("min", entry.min_players.to_string()),
            ("max", entry.max_players.to_string()),
            ("status", status_label(self.i18n, self.lang(), entry)),
        ])
    }

    /// Catalog listing with the menu keyboard. Prompts `/start` when no
    /// backend has been chosen.
    pub async fn show_main_menu(&self) -> Result<()> {
        let Some(backend) = self.backends.current() else {
            self.send(&self.t("errors.no_backend")).await;
            return Ok(());
        };

        let entries = backend.catalog.get_all().await?;
        let text = format!(
            "{}\n\n{}",
            render_catalog(&entries, self.i18n, self.lang()),
            self.t("menu.choose_action")
        );
        self.send_with(&text, main_menu_keyboard(self.i18n, self.lang())).await;
        Ok(())
    }

    /// Show the games as selection buttons carrying `<prefix>:<id>`.
    /// Returns false and says so when the catalog is empty.
    pub async fn show_entry_choice(&self, prompt_key: &str, prefix: &str) -> Result<bool> {
        let entries = self.backend()?.catalog.get_all().await?;
        if entries.is_empty() {
            self.send(&self.t("menu.no_games")).await;
            return Ok(false);
        }
        self.send_with(&self.t(prompt_key), entries_keyboard(&entries, prefix, self.i18n, self.lang()))
            .await;
        Ok(true)
    }

    /// Parse a `<prefix>:<id>` token. The "no games" placeholder is answered
    /// here; anything else unexpected is reported as unsupported.
    pub async fn selected_entry_token(&mut self, token: &str, prefix: &str) -> Option<i64> {
        if token == tokens::NO_GAMES {
            let text = self.t("menu.no_games");
            self.acknowledge(&text, false).await;
            return None;
        }
        match tokens::split(token) {
            (p, Some(value)) if p == prefix => match value.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    debug!(token = %token, "Malformed entry token");
                    self.unsupported_selection().await;
                    None
                }
            },
            _ => {
                self.unsupported_selection().await;
                None
            }
        }
    }
}

/// Handles the events arriving while a conversation sits on one step
#[async_trait]
pub trait StepHandler: Send + Sync {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, _text: &str) -> Result<()> {
        cx.use_buttons().await;
        Ok(())
    }

    async fn on_selection(&self, cx: &mut HandlerContext<'_>, _token: &str) -> Result<()> {
        cx.unsupported_selection().await;
        Ok(())
    }
}

/// Dispatch table from step to handler, built once at startup
pub struct HandlerRegistry {
    handlers: HashMap<Step, Arc<dyn StepHandler>>,
    fallback: Arc<dyn StepHandler>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    /// An empty table; every step goes to the fallback
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(FallbackHandler),
        }
    }

    /// The full table of step handlers
    pub fn with_default_handlers() -> Self {
        use super::{adding, deleting, editing, menu, planning, source, start};

        let mut registry = Self::new();
        registry.register(Step::Start, start::StartHandler);
        registry.register(Step::ChoosingSource, source::SourceHandler);
        registry.register(Step::MainMenu, menu::MenuHandler);
        registry.register(Step::AddingName, adding::AddingNameHandler);
        registry.register(Step::AddingCategory, adding::AddingCategoryHandler);
        registry.register(Step::AddingMin, adding::AddingMinHandler);
        registry.register(Step::AddingMax, adding::AddingMaxHandler);
        registry.register(Step::DeletingSelect, deleting::DeletingSelectHandler);
        registry.register(Step::DeletingConfirm, deleting::DeletingConfirmHandler);
        registry.register(Step::EditingSelect, editing::EditingSelectHandler);
        registry.register(Step::EditingField, editing::EditingFieldHandler);
        registry.register(Step::PlanningSelect, planning::PlanningSelectHandler);
        registry.register(Step::PlanningDate, planning::PlanningDateHandler);
        registry.register(Step::PlanningTime, planning::PlanningTimeHandler);
        registry
    }

    pub fn register(&mut self, step: Step, handler: impl StepHandler + 'static) {
        self.handlers.insert(step, Arc::new(handler));
    }

    /// The handler for `step`, or the fallback if none is registered
    pub fn get(&self, step: Step) -> Arc<dyn StepHandler> {
        self.handlers
            .get(&step)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn contains(&self, step: Step) -> bool {
        self.handlers.contains_key(&step)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
