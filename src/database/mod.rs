//! Database module
//!
//! This module handles catalog persistence: the PostgreSQL connection pool
//! and the catalog store backends.

pub mod connection;
pub mod repositories;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use repositories::{CatalogStore, JsonCatalogStore, PostgresCatalogStore};
