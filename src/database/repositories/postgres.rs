//! PostgreSQL catalog store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::CatalogStore;
use crate::models::{Category, Entry, EntryStatus, NewEntry};
use crate::utils::errors::{GameKeeperError, Result};

const ENTRY_COLUMNS: &str = "id, title, category, min_players, max_players, status, last_played";

/// Raw row of the `games` table
#[derive(Debug, Clone, FromRow)]
struct EntryRow {
    id: i64,
    title: String,
    category: String,
    min_players: i32,
    max_players: i32,
    status: String,
    last_played: Option<DateTime<Utc>>,
}

impl TryFrom<EntryRow> for Entry {
    type Error = GameKeeperError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let category: Category = row.category.parse().map_err(|_| {
            GameKeeperError::BackendUnavailable(format!(
                "games row {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;

        Ok(Entry {
            id: row.id,
            title: row.title,
            category,
            min_players: row.min_players,
            max_players: row.max_players,
            status: row.status.parse().unwrap_or(EntryStatus::Active),
            last_played: row.last_played,
        })
    }
}

fn into_entries(rows: Vec<EntryRow>) -> Result<Vec<Entry>> {
    rows.into_iter().map(Entry::try_from).collect()
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn add(&self, entry: NewEntry) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO games (title, category, min_players, max_players, status, last_played)
            VALUES ($1, $2, $3, $4, $5, NULL)
            RETURNING id
            "#
        )
        .bind(&entry.title)
        .bind(entry.category.as_str())
        .bind(entry.min_players)
        .bind(entry.max_players)
        .bind(EntryStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM games ORDER BY id",
            ENTRY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM games WHERE id = $1",
            ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Entry::try_from).transpose()
    }

    async fn update(&self, entry: &Entry) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE games
            SET title = $2,
                category = $3,
                min_players = $4,
                max_players = $5,
                status = $6,
                last_played = $7
            WHERE id = $1
            "#
        )
        .bind(entry.id)
        .bind(&entry.title)
        .bind(entry.category.as_str())
        .bind(entry.min_players)
        .bind(entry.max_players)
        .bind(entry.status.as_str())
        .bind(entry.last_played)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GameKeeperError::NotFound { entry_id: entry.id });
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GameKeeperError::NotFound { entry_id: id });
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM games WHERE title ILIKE $1 OR category ILIKE $1 ORDER BY id",
            ENTRY_COLUMNS
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn by_category_and_capacity(&self, category: Category, players: i32) -> Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM games WHERE category = $1 AND max_players >= $2 ORDER BY max_players DESC, id",
            ENTRY_COLUMNS
        ))
        .bind(category.as_str())
        .bind(players)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }
}
