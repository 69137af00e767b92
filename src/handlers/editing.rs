//! Edit-game wizard
//!
//! EDITING_FIELD has two sub-states: no field chosen yet (expects a
//! `field:` selection) and a field chosen (expects the new value).

use async_trait::async_trait;

use crate::i18n::params;
use crate::models::EditableField;
use crate::state::context::keys;
use crate::state::Step;
use crate::transport::keyboards::{
    cancel_keyboard, category_keyboard, category_label, field_keyboard, field_label, tokens,
};
use crate::utils::errors::{GameKeeperError, Result};
use crate::utils::logging::log_user_action;
use super::common::{HandlerContext, StepHandler};

pub struct EditingSelectHandler;

#[async_trait]
impl StepHandler for EditingSelectHandler {
    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        let Some(id) = cx.selected_entry_token(token, tokens::EDIT).await else {
            return Ok(());
        };
        let entry = cx.backend()?.catalog.require(id).await?;

        let text = cx.tp("editing.choose_field", &cx.entry_params(&entry));
        cx.context.selected_entry_id = Some(entry.id);
        cx.context.selected_entry = Some(entry);
        cx.go(Step::EditingField)?;
        cx.send_with(&text, field_keyboard(cx.i18n, cx.lang())).await;
        Ok(())
    }
}

pub struct EditingFieldHandler;

impl EditingFieldHandler {
    fn staged_field(cx: &HandlerContext<'_>) -> Option<EditableField> {
        cx.context
            .get_string(keys::EDITING_FIELD)
            .and_then(|name| name.parse().ok())
    }

    async fn choose_field(&self, cx: &mut HandlerContext<'_>, field: EditableField) -> Result<()> {
        let entry = cx
            .context
            .selected_entry
            .clone()
            .ok_or(GameKeeperError::MissingData("selected entry"))?;
        cx.context.set_data(keys::EDITING_FIELD, field.as_str())?;

        if field == EditableField::Category {
            let current = category_label(cx.i18n, cx.lang(), entry.category);
            cx.send_with(
                &cx.tp("editing.choose_category", &params([("value", current)])),
                category_keyboard(cx.i18n, cx.lang()),
            )
            .await;
        } else {
            let text = cx.tp(
                "editing.enter_value",
                &params([
                    ("field", field_label(cx.i18n, cx.lang(), field)),
                    ("value", field.current_value(&entry)),
                ]),
            );
            cx.send_with(&text, cancel_keyboard(cx.i18n, cx.lang())).await;
        }
        Ok(())
    }

    async fn apply(&self, cx: &mut HandlerContext<'_>, field: EditableField, value: &str) -> Result<()> {
        let id = cx.selected_id()?;
        let entry = cx.backend()?.catalog.update_field(id, field, value).await?;
        log_user_action(cx.user_id(), "edit_game", Some(field.as_str()));

        cx.send(&cx.tp("editing.success", &cx.entry_params(&entry))).await;
        cx.reset_to_menu();
        cx.show_main_menu().await
    }

    async fn back_to_list(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        cx.context.clear();
        if cx.show_entry_choice("editing.choose", tokens::EDIT).await? {
            cx.go(Step::EditingSelect)?;
        } else {
            cx.reset_to_menu();
            cx.show_main_menu().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StepHandler for EditingFieldHandler {
    async fn on_text(&self, cx: &mut HandlerContext<'_>, text: &str) -> Result<()> {
        match Self::staged_field(cx) {
            Some(field) => self.apply(cx, field, text).await,
            None => {
                cx.use_buttons().await;
                Ok(())
            }
        }
    }

    async fn on_selection(&self, cx: &mut HandlerContext<'_>, token: &str) -> Result<()> {
        if token == tokens::BACK_TO_LIST {
            return self.back_to_list(cx).await;
        }

        match tokens::split(token) {
            (tokens::FIELD, Some(name)) => {
                let field: EditableField = name.parse()?;
                self.choose_field(cx, field).await
            }
            (tokens::CATEGORY, Some(value)) if Self::staged_field(cx) == Some(EditableField::Category) => {
                self.apply(cx, EditableField::Category, value).await
            }
            _ => {
                cx.unsupported_selection().await;
                Ok(())
            }
        }
    }
}
