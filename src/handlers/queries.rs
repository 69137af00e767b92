//! Read-only catalog queries answered outside the conversation steps

use tracing::error;

use crate::i18n::{params, I18n};
use crate::models::{Category, Entry};
use crate::services::validation::parse_player_count;
use crate::services::{Backend, BackendRegistry};
use crate::transport::keyboards::render_entries;
use crate::transport::Transport;
use crate::utils::errors::{GameKeeperError, Result};

/// A query command with its raw argument text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Title or category substring
    Search(String),
    /// `<category> <players>`: games of the category for at least that many players
    Find(String),
    /// Games playable by exactly this many players
    Players(String),
}

impl CatalogQuery {
    fn usage_key(&self) -> &'static str {
        match self {
            CatalogQuery::Search(_) => "queries.search_usage",
            CatalogQuery::Find(_) => "queries.find_usage",
            CatalogQuery::Players(_) => "queries.players_usage",
        }
    }

    /// Split `<category> <players>`; the category may span several words
    pub fn parse_find_args(args: &str) -> Result<(Category, i32)> {
        let (category, players) = args
            .trim()
            .rsplit_once(char::is_whitespace)
            .ok_or(GameKeeperError::MissingData("players"))?;
        let category: Category = category.parse()?;
        let players = parse_player_count(players)?;
        Ok((category, players))
    }

    pub async fn run(&self, backend: &Backend) -> Result<Vec<Entry>> {
        match self {
            CatalogQuery::Search(query) => {
                if query.trim().is_empty() {
                    return Err(GameKeeperError::MissingData("query"));
                }
                backend.catalog.search(query.trim()).await
            }
            CatalogQuery::Find(args) => {
                let (category, players) = Self::parse_find_args(args)?;
                backend.catalog.by_category_and_capacity(category, players).await
            }
            CatalogQuery::Players(args) => {
                let players = parse_player_count(args)?;
                backend.sessions.games_for_players(players).await
            }
        }
    }
}

/// Run `query` against the active backend and render the reply text
pub async fn answer(query: &CatalogQuery, backends: &BackendRegistry, i18n: &I18n, lang: &str) -> String {
    let Some(backend) = backends.current() else {
        return i18n.t("errors.no_backend", lang, None);
    };

    match query.run(&backend).await {
        Ok(entries) if entries.is_empty() => i18n.t("queries.none", lang, None),
        Ok(entries) => format!(
            "{}\n{}",
            i18n.t("queries.results", lang, Some(&params([("count", entries.len().to_string())]))),
            render_entries(&entries, i18n, lang)
        ),
        Err(e) if e.is_backend() => {
            error!(query = ?query, error = %e, "Catalog query failed");
            i18n.t("errors.backend", lang, None)
        }
        Err(_) => i18n.t(query.usage_key(), lang, None),
    }
}

/// Answer a query directly to the user
pub async fn reply(
    transport: &dyn Transport,
    user_id: i64,
    query: &CatalogQuery,
    backends: &BackendRegistry,
    i18n: &I18n,
    lang: &str,
) {
    let text = answer(query, backends, i18n, lang).await;
    if let Err(e) = transport.send_text(user_id, &text).await {
        error!(user_id = user_id, error = %e, "Failed to send query results");
    }
}
