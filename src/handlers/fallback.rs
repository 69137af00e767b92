//! Handler for steps without a registered handler

use async_trait::async_trait;
use tracing::warn;

use crate::utils::errors::Result;
use super::common::{HandlerContext, StepHandler};

/// Apologizes and returns the user to the main menu
pub struct FallbackHandler;

impl FallbackHandler {
    async fn recover(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        warn!(user_id = cx.user_id(), step = %cx.step(), "No handler registered for step");
        cx.send(&cx.t("errors.fallback")).await;
        cx.reset_to_menu();
        cx.show_main_menu().await
    }
}

#[async_trait]
impl StepHandler for FallbackHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, _text: &str) -> Result<()> {
        self.recover(cx).await
    }

    async fn on_selection(&self, cx: &mut HandlerContext<'_>, _token: &str) -> Result<()> {
        self.recover(cx).await
    }
}
