//! Conversation engine
//!
//! Entry point for every inbound event. The engine serializes events per
//! user, applies the global shortcuts, routes to the step handler and turns
//! every error into a short localized reply.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::i18n::I18n;
use crate::services::BackendRegistry;
use crate::state::{ConversationContext, ScenarioManager, StateStorage, Step};
use crate::transport::keyboards::tokens;
use crate::transport::{EventKind, InboundEvent, Transport};
use crate::utils::errors::{ErrorSeverity, GameKeeperError, ParseError, Result, ValidationError};
use super::common::{HandlerContext, HandlerRegistry};
use super::queries::{self, CatalogQuery};

pub struct ConversationEngine {
    storage: StateStorage,
    handlers: HandlerRegistry,
    scenarios: ScenarioManager,
    backends: Arc<BackendRegistry>,
    transport: Arc<dyn Transport>,
    i18n: Arc<I18n>,
}

impl ConversationEngine {
    pub fn new(transport: Arc<dyn Transport>, i18n: Arc<I18n>, backends: Arc<BackendRegistry>) -> Self {
        Self::with_handlers(transport, i18n, backends, HandlerRegistry::with_default_handlers())
    }

    pub fn with_handlers(
        transport: Arc<dyn Transport>,
        i18n: Arc<I18n>,
        backends: Arc<BackendRegistry>,
        handlers: HandlerRegistry,
    ) -> Self {
        Self {
            storage: StateStorage::new(i18n.default_language()),
            handlers,
            scenarios: ScenarioManager::new(),
            backends,
            transport,
            i18n,
        }
    }

    pub fn storage(&self) -> &StateStorage {
        &self.storage
    }

    pub fn backends(&self) -> &Arc<BackendRegistry> {
        &self.backends
    }

    /// Handle one inbound event. Never fails; problems are reported to the
    /// user and logged.
    pub async fn dispatch(&self, event: InboundEvent) {
        let mut guard = self.storage.lock(event.user_id).await;
        let context: &mut ConversationContext = &mut guard;

        if let Some(code) = event.language_code.as_deref() {
            context.language = self.i18n.detect_user_language(Some(code));
        }

        debug!(
            user_id = event.user_id,
            step = %context.step,
            event = %event.kind.describe(),
            "Dispatching event"
        );

        let snapshot = context.clone();
        let event_id = match &event.kind {
            EventKind::Selection { event_id, .. } => Some(event_id.clone()),
            EventKind::Text(_) => None,
        };
        let mut cx = HandlerContext::new(
            context,
            self.transport.as_ref(),
            self.i18n.as_ref(),
            self.backends.as_ref(),
            &self.scenarios,
            event_id,
        );

        if let Err(e) = self.route(&mut cx, &event.kind).await {
            self.handle_error(&mut cx, e, snapshot).await;
        }
        cx.finish().await;

        debug!(summary = ?cx.context.summary(), "Event handled");
    }

    /// Answer a read-only query without touching the user's conversation
    pub async fn answer_query(&self, user_id: i64, language_code: Option<&str>, query: CatalogQuery) {
        let lang = self.i18n.detect_user_language(language_code);
        queries::reply(self.transport.as_ref(), user_id, &query, &self.backends, &self.i18n, &lang).await;
    }

    pub async fn send_help(&self, user_id: i64, language_code: Option<&str>) {
        let lang = self.i18n.detect_user_language(language_code);
        if let Err(e) = self.transport.send_text(user_id, &self.i18n.t("help", &lang, None)).await {
            warn!(user_id = user_id, error = %e, "Failed to send help");
        }
    }

    async fn route(&self, cx: &mut HandlerContext<'_>, kind: &EventKind) -> Result<()> {
        let step = cx.step();
        match kind {
            EventKind::Text(text) => {
                let text = text.trim();
                if is_start_command(text) {
                    cx.context.clear();
                    return self.handlers.get(Step::Start).on_text(cx, text).await;
                }
                self.handlers.get(step).on_text(cx, text).await
            }
            EventKind::Selection { token, .. } => {
                if self.scenarios.is_interruptible(step) {
                    match token.as_str() {
                        tokens::BACK => return self.back(cx).await,
                        tokens::CANCEL => return self.cancel(cx).await,
                        _ => {}
                    }
                }
                self.handlers.get(step).on_selection(cx, token).await
            }
        }
    }

    async fn back(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        cx.acknowledge("", false).await;
        cx.reset_to_menu();
        cx.show_main_menu().await
    }

    async fn cancel(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        cx.acknowledge("", false).await;
        if let Some(workflow) = cx.step().workflow() {
            cx.send(&cx.t(workflow.cancel_message_key())).await;
        }
        cx.reset_to_menu();
        cx.show_main_menu().await
    }

    async fn handle_error(&self, cx: &mut HandlerContext<'_>, err: GameKeeperError, snapshot: ConversationContext) {
        let user_id = cx.user_id();
        let step = cx.step();
        match err.severity() {
            ErrorSeverity::Info => debug!(user_id = user_id, step = %step, error = %err, "Input rejected"),
            ErrorSeverity::Warning => warn!(user_id = user_id, step = %step, error = %err, "Handler warning"),
            severity => error!(
                user_id = user_id,
                step = %step,
                severity = %severity,
                recoverable = err.is_recoverable(),
                error = %err,
                "Handler failed"
            ),
        }

        match &err {
            GameKeeperError::MissingData(_) => {
                cx.send(&cx.t("errors.missing_data")).await;
                cx.reset_to_menu();
                if let Err(e) = cx.show_main_menu().await {
                    error!(user_id = user_id, error = %e, "Failed to show main menu after reset");
                }
            }
            e if e.is_backend() => {
                *cx.context = snapshot;
                let key = if self.backends.current().is_none() {
                    "errors.no_backend"
                } else {
                    "errors.backend"
                };
                cx.send(&cx.t(key)).await;
            }
            GameKeeperError::InvalidStateTransition { .. }
            | GameKeeperError::Telegram(_)
            | GameKeeperError::Config(_) => {
                *cx.context = snapshot;
                cx.send(&cx.t("errors.generic")).await;
            }
            other => cx.send(&cx.t(error_message_key(other))).await,
        }
    }
}

fn is_start_command(text: &str) -> bool {
    text == "/start" || text.starts_with("/start ") || text.starts_with("/start@")
}

/// Translation key of the reply for a user-facing error
pub fn error_message_key(err: &GameKeeperError) -> &'static str {
    match err {
        GameKeeperError::Validation(v) => match v {
            ValidationError::TitleLength { .. } => "errors.title_length",
            ValidationError::UnknownCategory(_) => "errors.unknown_category",
            ValidationError::MinPlayersRange(_) => "errors.min_players",
            ValidationError::MaxPlayersRange(_) => "errors.max_players",
            ValidationError::MaxBelowMin { .. } => "errors.max_below_min",
            ValidationError::UnknownField(_) => "errors.unknown_field",
        },
        GameKeeperError::NotFound { .. } => "errors.not_found",
        GameKeeperError::Parse(p) => match p {
            ParseError::Date(_) => "errors.parse_date",
            ParseError::Time(_) => "errors.parse_time",
            ParseError::Number(_) => "errors.parse_number",
        },
        GameKeeperError::PastDate => "errors.past_date",
        GameKeeperError::MissingData(_) => "errors.missing_data",
        e if e.is_backend() => "errors.backend",
        _ => "errors.generic",
    }
}
