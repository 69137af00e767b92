//! Services module
//!
//! This module contains business logic services and the registry that
//! resolves them against the currently selected storage backend.

pub mod catalog;
pub mod session;
pub mod status;
pub mod validation;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

pub use catalog::CatalogService;
pub use session::{ScheduledSession, SessionService};
pub use status::derive_status;

use crate::config::{DatabaseConfig, Settings};
use crate::database::{self, CatalogStore, DatabasePool, JsonCatalogStore, PostgresCatalogStore};
use crate::utils::errors::{GameKeeperError, Result};

/// Persistence backends a user can choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Json,
    Postgres,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Json, BackendKind::Postgres];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Json => "json",
            BackendKind::Postgres => "postgres",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(BackendKind::Json),
            "postgres" => Ok(BackendKind::Postgres),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Services bound to one backend
pub struct Backend {
    pub kind: BackendKind,
    pub catalog: CatalogService,
    pub sessions: SessionService,
}

impl Backend {
    pub fn new(kind: BackendKind, store: Arc<dyn CatalogStore>) -> Self {
        let catalog = CatalogService::new(store);
        let sessions = SessionService::new(catalog.clone());
        Self { kind, catalog, sessions }
    }
}

/// Holds the active backend behind an atomically swappable handle.
///
/// Switching backends replaces the handle only; conversation state and the
/// handler table are untouched. Stores are opened lazily and reused.
pub struct BackendRegistry {
    json_path: PathBuf,
    database: DatabaseConfig,
    json_store: OnceCell<Arc<JsonCatalogStore>>,
    pg_pool: OnceCell<DatabasePool>,
    active: ArcSwapOption<Backend>,
}

impl BackendRegistry {
    pub fn new(settings: &Settings) -> Self {
        Self {
            json_path: PathBuf::from(&settings.storage.json_path),
            database: settings.database.clone(),
            json_store: OnceCell::new(),
            pg_pool: OnceCell::new(),
            active: ArcSwapOption::empty(),
        }
    }

    /// Open (or reuse) the store for `kind` and make it the active backend
    pub async fn activate(&self, kind: BackendKind) -> Result<Arc<Backend>> {
        let store: Arc<dyn CatalogStore> = match kind {
            BackendKind::Json => {
                let store = self
                    .json_store
                    .get_or_try_init(|| async {
                        JsonCatalogStore::open(&self.json_path).await.map(Arc::new)
                    })
                    .await?;
                store.clone()
            }
            BackendKind::Postgres => {
                let pool = self
                    .pg_pool
                    .get_or_try_init(|| async {
                        let pool = database::create_pool(&self.database).await?;
                        database::run_migrations(&pool).await?;
                        Ok::<_, GameKeeperError>(pool)
                    })
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "PostgreSQL backend could not be initialized");
                        e
                    })?;
                Arc::new(PostgresCatalogStore::new(pool.clone()))
            }
        };

        Ok(self.install(kind, store))
    }

    /// Make `store` the active backend
    pub fn install(&self, kind: BackendKind, store: Arc<dyn CatalogStore>) -> Arc<Backend> {
        let backend = Arc::new(Backend::new(kind, store));
        let previous = self.active.swap(Some(backend.clone()));
        info!(
            backend = %kind,
            previous = ?previous.as_ref().map(|b| b.kind),
            "Storage backend switched"
        );
        backend
    }

    pub fn current(&self) -> Option<Arc<Backend>> {
        self.active.load_full()
    }

    /// The active backend, or `BackendUnavailable` if none was chosen yet
    pub fn require_current(&self) -> Result<Arc<Backend>> {
        self.current()
            .ok_or_else(|| GameKeeperError::BackendUnavailable("no storage backend selected".to_string()))
    }
}
