//! JSON file catalog store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::CatalogStore;
use crate::models::{Category, Entry, NewEntry};
use crate::utils::errors::{GameKeeperError, Result};

/// On-disk layout. `next_id` keeps ids ascending even after deletes.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CatalogFile {
    next_id: i64,
    entries: Vec<Entry>,
}

impl CatalogFile {
    fn allocate_id(&mut self) -> i64 {
        let floor = self.entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(floor);
        self.next_id = id + 1;
        id
    }
}

/// Catalog kept in a single JSON file.
///
/// The whole catalog is held in memory behind a mutex and rewritten on every
/// change through a temporary sibling file and a rename. The in-memory copy
/// only changes once the file has been written.
pub struct JsonCatalogStore {
    path: PathBuf,
    catalog: Mutex<CatalogFile>,
}

impl JsonCatalogStore {
    /// Open the store, creating an empty catalog if the file is missing.
    ///
    /// A file that fails to parse is moved aside to `<file>.corrupt` and the
    /// store starts empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let catalog = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => CatalogFile::default(),
            Ok(content) => match serde_json::from_str::<CatalogFile>(&content) {
                Ok(catalog) => catalog,
                Err(e) => {
                    let backup = corrupt_path(&path);
                    warn!(path = %path.display(), backup = %backup.display(), error = %e,
                          "Catalog file is corrupted, starting with an empty catalog");
                    fs::rename(&path, &backup).await?;
                    CatalogFile::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Catalog file not found, creating a new one");
                CatalogFile::default()
            }
            Err(e) => return Err(e.into()),
        };

        let store = Self {
            path,
            catalog: Mutex::new(catalog),
        };
        {
            let catalog = store.catalog.lock().await;
            store.persist(&catalog).await?;
            debug!(entries = catalog.entries.len(), "JSON catalog loaded");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, catalog: &CatalogFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let serialized = serde_json::to_string_pretty(catalog)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Write `next` to disk, then make it the current catalog
    async fn commit(&self, current: &mut CatalogFile, next: CatalogFile) -> Result<()> {
        if let Err(e) = self.persist(&next).await {
            warn!(path = %self.path.display(), error = %e, "Failed to write catalog file, change discarded");
            return Err(e);
        }
        *current = next;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

#[async_trait]
impl CatalogStore for JsonCatalogStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn add(&self, entry: NewEntry) -> Result<i64> {
        let mut catalog = self.catalog.lock().await;
        let mut next = catalog.clone();
        let id = next.allocate_id();
        next.entries.push(entry.into_entry(id));
        self.commit(&mut catalog, next).await?;
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<Entry>> {
        let catalog = self.catalog.lock().await;
        let mut entries = catalog.entries.clone();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Entry>> {
        let catalog = self.catalog.lock().await;
        Ok(catalog.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn update(&self, entry: &Entry) -> Result<()> {
        let mut catalog = self.catalog.lock().await;
        let mut next = catalog.clone();
        let slot = next
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(GameKeeperError::NotFound { entry_id: entry.id })?;
        *slot = entry.clone();
        self.commit(&mut catalog, next).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut catalog = self.catalog.lock().await;
        let mut next = catalog.clone();
        next.entries.retain(|e| e.id != id);
        if next.entries.len() == catalog.entries.len() {
            return Err(GameKeeperError::NotFound { entry_id: id });
        }
        self.commit(&mut catalog, next).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Entry>> {
        let needle = query.trim().to_lowercase();
        let catalog = self.catalog.lock().await;
        Ok(catalog
            .entries
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle) || e.category.matches_query(&needle))
            .cloned()
            .collect())
    }

    async fn by_category_and_capacity(&self, category: Category, players: i32) -> Result<Vec<Entry>> {
        let catalog = self.catalog.lock().await;
        let mut entries: Vec<Entry> = catalog
            .entries
            .iter()
            .filter(|e| e.category == category && e.max_players >= players)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.max_players.cmp(&a.max_players));
        Ok(entries)
    }
}
