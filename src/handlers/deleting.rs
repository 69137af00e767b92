//! Delete-game wizard: pick a game, then confirm

use async_trait::async_trait;

use crate::i18n::params;
use crate::state::Step;
use crate::transport::keyboards::{confirmation_keyboard, tokens};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::common::{HandlerContext, StepHandler};

pub struct DeletingSelectHandler;

#[async_trait]
impl StepHandler for DeletingSelectHandler {
    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        let Some(id) = cx.selected_entry_token(token, tokens::DELETE).await else {
            return Ok(());
        };
        let entry = cx.backend()?.catalog.require(id).await?;

        cx.context.selected_entry_id = Some(entry.id);
        cx.go(Step::DeletingConfirm)?;
        cx.send_with(
            &cx.tp("deleting.confirm", &cx.entry_params(&entry)),
            confirmation_keyboard(cx.i18n, cx.lang()),
        )
        .await;
        Ok(())
    }
}

pub struct DeletingConfirmHandler;

#[async_trait]
impl StepHandler for DeletingConfirmHandler {
    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        match tokens::split(token) {
            (tokens::CONFIRM, Some(tokens::YES)) => {
                let id = cx.selected_id()?;
                let backend = cx.backend()?;
                let entry = backend.catalog.require(id).await?;
                backend.catalog.delete(id).await?;
                log_user_action(cx.user_id(), "delete_game", Some(&entry.title));

                cx.send(&cx.tp("deleting.success", &params([("title", entry.title)]))).await;
            }
            (tokens::CONFIRM, Some(tokens::NO)) => {
                cx.send(&cx.t("deleting.cancelled")).await;
            }
            _ => {
                cx.unsupported_selection().await;
                return Ok(());
            }
        }

        cx.reset_to_menu();
        cx.show_main_menu().await
    }
}
