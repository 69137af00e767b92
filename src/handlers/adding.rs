//! Add-game wizard: title, category, minimum and maximum players

use async_trait::async_trait;

use crate::i18n::params;
use crate::services::validation::{parse_player_count, valid_category, valid_max_players, valid_min_players, valid_title};
use crate::state::context::keys;
use crate::state::Step;
use crate::transport::keyboards::{cancel_keyboard, category_keyboard, category_label, tokens};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::common::{HandlerContext, StepHandler};

pub struct AddingNameHandler;

#[async_trait]
impl StepHandler for AddingNameHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        let title = text.trim();
        valid_title(title)?;

        cx.context.set_data(keys::TITLE, title)?;
        cx.go(Step::AddingCategory)?;
        cx.send_with(
            &cx.tp("adding.choose_category", &params([("title", title.to_string())])),
            category_keyboard(cx.i18n, cx.lang()),
        )
        .await;
        Ok(())
    }
}

pub struct AddingCategoryHandler;

#[async_trait]
impl StepHandler for AddingCategoryHandler {
    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        let (tokens::CATEGORY, Some(value)) = tokens::split(token) else {
            cx.unsupported_selection().await;
            return Ok(());
        };
        let category = valid_category(value)?;
        cx.staged_string(keys::TITLE)?;

        cx.context.set_data(keys::CATEGORY, category.as_str())?;
        cx.go(Step::AddingMin)?;
        let label = category_label(cx.i18n, cx.lang(), category);
        cx.send_with(
            &cx.tp("adding.enter_min", &params([("category", label)])),
            cancel_keyboard(cx.i18n, cx.lang()),
        )
        .await;
        Ok(())
    }
}

pub struct AddingMinHandler;

#[async_trait]
impl StepHandler for AddingMinHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        cx.staged_string(keys::TITLE)?;
        cx.staged_string(keys::CATEGORY)?;

        let min_players = parse_player_count(text)?;
        valid_min_players(min_players)?;

        cx.context.set_data(keys::MIN_PLAYERS, min_players)?;
        cx.go(Step::AddingMax)?;
        cx.send_with(&cx.t("adding.enter_max"), cancel_keyboard(cx.i18n, cx.lang())).await;
        Ok(())
    }
}

pub struct AddingMaxHandler;

#[async_trait]
impl StepHandler for AddingMaxHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        let title = cx.staged_string(keys::TITLE)?;
        let category = cx.staged_string(keys::CATEGORY)?;
        let min_players = cx.staged_i32(keys::MIN_PLAYERS)?;

        let max_players = parse_player_count(text)?;
        valid_max_players(min_players, max_players)?;

        let backend = cx.backend()?;
        let entry = backend.catalog.create(&title, &category, min_players, max_players).await?;
        log_user_action(cx.user_id(), "add_game", Some(&entry.title));

        cx.send(&cx.tp("adding.success", &params([("title", entry.title.clone())]))).await;
        cx.reset_to_menu();
        cx.show_main_menu().await
    }
}
