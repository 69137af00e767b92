//! Play session scheduling

use chrono::{Local, NaiveDateTime, Utc};
use tracing::info;

use crate::models::Entry;
use crate::services::catalog::CatalogService;
use crate::services::status::refresh_status;
use crate::utils::errors::{GameKeeperError, Result};

/// A confirmed session
#[derive(Debug, Clone)]
pub struct ScheduledSession {
    pub entry: Entry,
    pub when: NaiveDateTime,
}

#[derive(Clone)]
pub struct SessionService {
    catalog: CatalogService,
}

impl SessionService {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// Schedule a session at `when` (server local time).
    ///
    /// The game's last-played timestamp becomes the moment of scheduling,
    /// not `when`.
    pub async fn schedule_session(&self, entry_id: i64, when: NaiveDateTime) -> Result<ScheduledSession> {
        self.schedule_session_at(entry_id, when, Local::now().naive_local()).await
    }

    pub async fn schedule_session_at(
        &self,
        entry_id: i64,
        when: NaiveDateTime,
        now_local: NaiveDateTime,
    ) -> Result<ScheduledSession> {
        let mut entry = self.catalog.require(entry_id).await?;
        if when < now_local {
            return Err(GameKeeperError::PastDate);
        }

        let now = Utc::now();
        entry.last_played = Some(now);
        refresh_status(&mut entry, now);
        self.catalog.persist(&entry).await?;

        info!(entry_id = entry_id, when = %when, "Play session scheduled");
        Ok(ScheduledSession { entry, when })
    }

    /// Games that can be played by exactly `players` people
    pub async fn games_for_players(&self, players: i32) -> Result<Vec<Entry>> {
        Ok(self
            .catalog
            .get_all()
            .await?
            .into_iter()
            .filter(|e| e.fits_players(players))
            .collect())
    }
}
