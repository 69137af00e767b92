//! Session planning wizard: pick a game, a date, then a time

use async_trait::async_trait;
use chrono::{Duration, Local};

use crate::i18n::params;
use crate::services::validation::{parse_time, valid_date};
use crate::state::Step;
use crate::transport::keyboards::{cancel_keyboard, tokens};
use crate::utils::errors::{GameKeeperError, Result};
use crate::utils::helpers::{format_date, format_time};
use crate::utils::logging::log_user_action;
use super::common::{HandlerContext, StepHandler};

pub struct PlanningSelectHandler;

#[async_trait]
impl StepHandler for PlanningSelectHandler {
    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        let Some(id) = cx.selected_entry_token(token, tokens::PLAN).await else {
            return Ok(());
        };
        let entry = cx.backend()?.catalog.require(id).await?;

        let example = format_date(Local::now().date_naive() + Duration::days(1));
        cx.context.selected_entry_id = Some(entry.id);
        cx.go(Step::PlanningDate)?;
        cx.send_with(
            &cx.tp("planning.enter_date", &params([("title", entry.title), ("example", example)])),
            cancel_keyboard(cx.i18n, cx.lang()),
        )
        .await;
        Ok(())
    }
}

pub struct PlanningDateHandler;

#[async_trait]
impl StepHandler for PlanningDateHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        cx.selected_id()?;
        let date = valid_date(text)?;

        cx.context.staged_date = Some(date);
        cx.go(Step::PlanningTime)?;
        cx.send_with(
            &cx.tp("planning.enter_time", &params([("date", format_date(date))])),
            cancel_keyboard(cx.i18n, cx.lang()),
        )
        .await;
        Ok(())
    }
}

pub struct PlanningTimeHandler;

#[async_trait]
impl StepHandler for PlanningTimeHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        let id = cx.selected_id()?;
        let date = cx.context.staged_date.ok_or(GameKeeperError::MissingData("date"))?;
        let time = parse_time(text)?;
        cx.context.staged_time = Some(time);

        let session = cx.backend()?.sessions.schedule_session(id, date.and_time(time)).await?;
        log_user_action(cx.user_id(), "plan_session", Some(&session.entry.title));

        let text = cx.tp(
            "planning.success",
            &params([
                ("title", session.entry.title.clone()),
                ("date", format_date(date)),
                ("time", format_time(time)),
            ]),
        );
        cx.send(&text).await;
        cx.reset_to_menu();
        cx.show_main_menu().await
    }
}
