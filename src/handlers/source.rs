//! Data source selection

use async_trait::async_trait;
use tracing::{error, info};

use crate::i18n::params;
use crate::services::BackendKind;
use crate::state::Step;
use crate::transport::keyboards::{source_keyboard, tokens};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::common::{HandlerContext, StepHandler};

pub struct SourceHandler;

impl SourceHandler {
    async fn reprompt(&self, cx: &HandlerContext<'_>, text: &str) {
        let with_back = cx.backends.current().is_some();
        cx.send_with(text, source_keyboard(cx.i18n, cx.lang(), with_back)).await;
    }
}

#[async_trait]
impl StepHandler for SourceHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, _text: &str) -> Result<()> {
        self.reprompt(cx, &cx.t("source.use_buttons")).await;
        Ok(())
    }

    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        let kind = match tokens::split(token) {
            (tokens::SOURCE, Some(value)) => value.parse::<BackendKind>().ok(),
            _ => None,
        };
        let Some(kind) = kind else {
            let text = cx.tp("source.unknown", &params([("token", token.to_string())]));
            self.reprompt(cx, &text).await;
            return Ok(());
        };

        let source_name = cx.t(&format!("source.{}", kind.as_str()));
        if let Err(e) = cx.backends.activate(kind).await {
            error!(user_id = cx.user_id(), backend = %kind, error = %e, "Failed to activate backend");
            let text = cx.tp("source.failed", &params([("source", source_name)]));
            self.reprompt(cx, &text).await;
            return Ok(());
        }

        log_user_action(cx.user_id(), "select_source", Some(kind.as_str()));
        info!(user_id = cx.user_id(), backend = %kind, "Data source selected");

        cx.go(Step::MainMenu)?;
        cx.context.clear();
        cx.send(&cx.tp("source.selected", &params([("source", source_name)]))).await;
        cx.show_main_menu().await
    }
}
