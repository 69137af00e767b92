//! Welcome step

use async_trait::async_trait;
use tracing::info;

use crate::state::Step;
use crate::transport::keyboards::source_keyboard;
use crate::utils::errors::Result;
use super::common::{HandlerContext, StepHandler};

/// Greets the user and asks for a data source
pub struct StartHandler;

impl StartHandler {
    async fn welcome(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        info!(user_id = cx.user_id(), "Conversation started");

        let with_back = cx.backends.current().is_some();
        let keyboard = source_keyboard(cx.i18n, cx.lang(), with_back);
        cx.go(Step::ChoosingSource)?;
        cx.send_with(&cx.t("welcome"), keyboard).await;
        Ok(())
    }
}

#[async_trait]
impl StepHandler for StartHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, _text: &str) -> Result<()> {
        self.welcome(cx).await
    }

    async fn on_selection(&self, cx: &mut HandlerContext<'_>, _token: &str) -> Result<()> {
        self.welcome(cx).await
    }
}
