//! Keyboard builders and selection tokens

use crate::i18n::{params, I18n};
use crate::models::{Category, EditableField, Entry};
use crate::services::BackendKind;
use crate::utils::helpers::truncate_text;
use super::{Keyboard, OptionButton};

/// Selection tokens. Parameterized tokens are `<prefix>:<value>`.
pub mod tokens {
    pub const BACK: &str = "back";
    pub const CANCEL: &str = "cancel";
    pub const BACK_TO_LIST: &str = "back_to_list";
    pub const NO_GAMES: &str = "no_games";

    pub const SOURCE: &str = "source";
    pub const CATEGORY: &str = "category";
    pub const DELETE: &str = "delete";
    pub const EDIT: &str = "edit";
    pub const PLAN: &str = "plan";
    pub const CONFIRM: &str = "confirm";
    pub const FIELD: &str = "field";

    pub const YES: &str = "yes";
    pub const NO: &str = "no";

    pub fn with_value(prefix: &str, value: impl std::fmt::Display) -> String {
        format!("{}:{}", prefix, value)
    }

    /// Split "prefix:value" into its parts
    pub fn split(token: &str) -> (&str, Option<&str>) {
        match token.split_once(':') {
            Some((prefix, value)) => (prefix, Some(value)),
            None => (token, None),
        }
    }
}

const BUTTON_TITLE_CHARS: usize = 40;

fn back_row(i18n: &I18n, lang: &str) -> Vec<OptionButton> {
    vec![OptionButton::new(i18n.t("buttons.back_to_menu", lang, None), tokens::BACK)]
}

fn cancel_row(i18n: &I18n, lang: &str) -> Vec<OptionButton> {
    vec![OptionButton::new(i18n.t("buttons.cancel", lang, None), tokens::CANCEL)]
}

/// Backend choice, with a way back only once a backend is active
pub fn source_keyboard(i18n: &I18n, lang: &str, with_back: bool) -> Keyboard {
    let mut rows: Vec<Vec<OptionButton>> = BackendKind::ALL
        .iter()
        .map(|kind| {
            vec![OptionButton::new(
                i18n.t(&format!("source.{}", kind.as_str()), lang, None),
                tokens::with_value(tokens::SOURCE, kind),
            )]
        })
        .collect();
    if with_back {
        rows.push(back_row(i18n, lang));
    }
    Keyboard::Inline(rows)
}

/// Categories two per row
pub fn category_keyboard(i18n: &I18n, lang: &str) -> Keyboard {
    let mut rows: Vec<Vec<OptionButton>> = Category::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|category| {
                    OptionButton::new(
                        category_label(i18n, lang, *category),
                        tokens::with_value(tokens::CATEGORY, category),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(cancel_row(i18n, lang));
    Keyboard::Inline(rows)
}

/// One button per game, numbered, carrying `<prefix>:<id>`
pub fn entries_keyboard(entries: &[Entry], prefix: &str, i18n: &I18n, lang: &str) -> Keyboard {
    let mut rows: Vec<Vec<OptionButton>> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            vec![OptionButton::new(
                format!("{}. {}", i + 1, truncate_text(&entry.title, BUTTON_TITLE_CHARS)),
                tokens::with_value(prefix, entry.id),
            )]
        })
        .collect();
    if rows.is_empty() {
        rows.push(vec![OptionButton::new(i18n.t("buttons.no_games", lang, None), tokens::NO_GAMES)]);
    }
    rows.push(back_row(i18n, lang));
    Keyboard::Inline(rows)
}

pub fn confirmation_keyboard(i18n: &I18n, lang: &str) -> Keyboard {
    Keyboard::Inline(vec![
        vec![
            OptionButton::new(i18n.t("buttons.yes", lang, None), tokens::with_value(tokens::CONFIRM, tokens::YES)),
            OptionButton::new(i18n.t("buttons.no", lang, None), tokens::with_value(tokens::CONFIRM, tokens::NO)),
        ],
        back_row(i18n, lang),
    ])
}

pub fn field_keyboard(i18n: &I18n, lang: &str) -> Keyboard {
    let mut rows: Vec<Vec<OptionButton>> = EditableField::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|field| {
                    OptionButton::new(field_label(i18n, lang, *field), tokens::with_value(tokens::FIELD, field))
                })
                .collect()
        })
        .collect();
    rows.push(vec![
        OptionButton::new(i18n.t("buttons.back_to_list", lang, None), tokens::BACK_TO_LIST),
        OptionButton::new(i18n.t("buttons.back_to_menu", lang, None), tokens::BACK),
    ]);
    Keyboard::Inline(rows)
}

/// A lone cancel button for steps that expect typed input
pub fn cancel_keyboard(i18n: &I18n, lang: &str) -> Keyboard {
    Keyboard::Inline(vec![cancel_row(i18n, lang)])
}

/// Main menu commands as a persistent reply keyboard
pub fn main_menu_keyboard(i18n: &I18n, lang: &str) -> Keyboard {
    let label = |key: &str| i18n.t(key, lang, None);
    Keyboard::Reply(vec![
        vec![label("menu.add"), label("menu.edit")],
        vec![label("menu.delete"), label("menu.plan")],
        vec![label("menu.random"), label("menu.refresh")],
        vec![label("menu.source")],
    ])
}

pub fn category_label(i18n: &I18n, lang: &str, category: Category) -> String {
    i18n.t(&format!("categories.{}", category.as_str()), lang, None)
}

pub fn field_label(i18n: &I18n, lang: &str, field: EditableField) -> String {
    i18n.t(&format!("fields.{}", field.as_str()), lang, None)
}

pub fn status_label(i18n: &I18n, lang: &str, entry: &Entry) -> String {
    i18n.t(&format!("status.{}", entry.status.as_str()), lang, None)
}

/// The numbered collection listing shown with the main menu
pub fn render_catalog(entries: &[Entry], i18n: &I18n, lang: &str) -> String {
    if entries.is_empty() {
        return i18n.t("menu.empty", lang, None);
    }

    let header = i18n.t("menu.list_header", lang, Some(&params([("count", entries.len().to_string())])));
    format!("{}\n{}", header, render_entries(entries, i18n, lang))
}

/// One numbered item per game, newline separated
pub fn render_entries(entries: &[Entry], i18n: &I18n, lang: &str) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            i18n.t(
                "menu.list_item",
                lang,
                Some(&params([
                    ("index", (i + 1).to_string()),
                    ("title", entry.title.clone()),
                    ("category", category_label(i18n, lang, entry.category)),
                    ("min", entry.min_players.to_string()),
                    ("max", entry.max_players.to_string()),
                    ("status", status_label(i18n, lang, entry)),
                ])),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
