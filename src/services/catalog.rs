//! Catalog service implementation
//!
//! Business operations over the active catalog store: validated creation,
//! single-field edits, status refresh and the random pick.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::future::try_join_all;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::database::CatalogStore;
use crate::models::{Category, EditableField, Entry, NewEntry};
use crate::services::status::refresh_status;
use crate::services::validation::{
    parse_player_count, valid_category, valid_max_players, valid_min_players, valid_title,
};
use crate::utils::errors::{GameKeeperError, Result};
use crate::utils::logging::log_catalog_operation;

/// Days without play after which a game is preferred by the random pick
pub const RANDOM_PICK_IDLE_DAYS: i64 = 14;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Validate all four fields and persist a new game
    pub async fn create(&self, title: &str, category: &str, min_players: i32, max_players: i32) -> Result<Entry> {
        let title = title.trim();
        valid_title(title)?;
        let category = valid_category(category)?;
        valid_min_players(min_players)?;
        valid_max_players(min_players, max_players)?;

        let new_entry = NewEntry {
            title: title.to_string(),
            category,
            min_players,
            max_players,
        };
        let id = self.store.add(new_entry.clone()).await?;
        log_catalog_operation("create", self.backend_name(), Some(id), true);
        info!(entry_id = id, title = %new_entry.title, "Game added to catalog");

        Ok(new_entry.into_entry(id))
    }

    /// All games with freshly derived status
    pub async fn get_all(&self) -> Result<Vec<Entry>> {
        let mut entries = self.store.get_all().await?;
        let now = Utc::now();
        for entry in &mut entries {
            refresh_status(entry, now);
        }
        Ok(entries)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Entry>> {
        let mut entry = self.store.get_by_id(id).await?;
        if let Some(entry) = entry.as_mut() {
            refresh_status(entry, Utc::now());
        }
        Ok(entry)
    }

    /// Like `get_by_id`, but a missing game is an error
    pub async fn require(&self, id: i64) -> Result<Entry> {
        self.get_by_id(id)
            .await?
            .ok_or(GameKeeperError::NotFound { entry_id: id })
    }

    /// Apply a single-field edit.
    ///
    /// Only the edited field is checked. Changing the minimum does not
    /// re-check an existing maximum; changing the maximum checks it against
    /// the stored minimum.
    pub async fn update_field(&self, id: i64, field: EditableField, value: &str) -> Result<Entry> {
        let mut entry = self.require(id).await?;

        match field {
            EditableField::Title => {
                let title = value.trim();
                valid_title(title)?;
                entry.title = title.to_string();
            }
            EditableField::Category => {
                entry.category = valid_category(value)?;
            }
            EditableField::MinPlayers => {
                let min = parse_player_count(value)?;
                valid_min_players(min)?;
                entry.min_players = min;
            }
            EditableField::MaxPlayers => {
                let max = parse_player_count(value)?;
                valid_max_players(entry.min_players, max)?;
                entry.max_players = max;
            }
        }

        refresh_status(&mut entry, Utc::now());
        self.store.update(&entry).await?;
        log_catalog_operation("update", self.backend_name(), Some(id), true);
        info!(entry_id = id, field = %field, "Game updated");

        Ok(entry)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.store.get_by_id(id).await?.is_none() {
            return Err(GameKeeperError::NotFound { entry_id: id });
        }
        self.store.delete(id).await?;
        log_catalog_operation("delete", self.backend_name(), Some(id), true);
        info!(entry_id = id, "Game deleted");
        Ok(())
    }

    /// Recompute every status and persist only the ones that changed.
    /// Returns the number of games whose status changed.
    pub async fn refresh_all_statuses(&self) -> Result<usize> {
        let now = Utc::now();
        let mut changed = Vec::new();
        for mut entry in self.store.get_all().await? {
            if refresh_status(&mut entry, now) {
                changed.push(entry);
            }
        }
        let count = changed.len();

        try_join_all(changed.iter().map(|entry| self.store.update(entry))).await?;

        info!(changed = count, backend = self.backend_name(), "Statuses refreshed");
        Ok(count)
    }

    /// Pick a random game, preferring ones idle for at least two weeks
    pub async fn pick_random(&self) -> Result<Option<Entry>> {
        let entries = self.get_all().await?;
        let cutoff = Utc::now() - Duration::days(RANDOM_PICK_IDLE_DAYS);

        let idle: Vec<&Entry> = entries
            .iter()
            .filter(|e| e.last_played.map_or(true, |played| played <= cutoff))
            .collect();

        let mut rng = rand::thread_rng();
        let pick = if idle.is_empty() {
            entries.choose(&mut rng).cloned()
        } else {
            idle.choose(&mut rng).map(|e| (*e).clone())
        };

        debug!(candidates = idle.len(), total = entries.len(), picked = ?pick.as_ref().map(|e| e.id),
               "Random game picked");
        Ok(pick)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Entry>> {
        let mut entries = self.store.search(query).await?;
        let now = Utc::now();
        for entry in &mut entries {
            refresh_status(entry, now);
        }
        Ok(entries)
    }

    pub async fn by_category_and_capacity(&self, category: Category, players: i32) -> Result<Vec<Entry>> {
        let mut entries = self.store.by_category_and_capacity(category, players).await?;
        let now = Utc::now();
        for entry in &mut entries {
            refresh_status(entry, now);
        }
        Ok(entries)
    }

    pub async fn single_player(&self) -> Result<Vec<Entry>> {
        Ok(self.get_all().await?.into_iter().filter(Entry::is_single_player).collect())
    }

    pub async fn multiplayer(&self) -> Result<Vec<Entry>> {
        Ok(self.get_all().await?.into_iter().filter(Entry::is_multiplayer).collect())
    }

    pub(crate) async fn persist(&self, entry: &Entry) -> Result<()> {
        self.store.update(entry).await
    }
}
