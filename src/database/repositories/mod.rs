//! Catalog store contract and its backends
//!
//! The conversation layer only ever sees `Arc<dyn CatalogStore>`, so the
//! JSON file and the PostgreSQL table are interchangeable at runtime.

pub mod json;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Category, Entry, NewEntry};
use crate::utils::errors::Result;

pub use json::JsonCatalogStore;
pub use postgres::PostgresCatalogStore;

/// CRUD and search over catalog entries.
///
/// Implementations assign unique, ascending identifiers in `add`. `update`
/// and `delete` report `NotFound` for unknown ids.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    async fn add(&self, entry: NewEntry) -> Result<i64>;

    async fn get_all(&self) -> Result<Vec<Entry>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Entry>>;

    async fn update(&self, entry: &Entry) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// Case-insensitive substring match on title or category
    async fn search(&self, query: &str) -> Result<Vec<Entry>>;

    /// Games of `category` that seat at least `players`, largest first
    async fn by_category_and_capacity(&self, category: Category, players: i32) -> Result<Vec<Entry>>;
}
