//! In-memory conversation storage
//!
//! Contexts live for the lifetime of the process. Each user gets one slot
//! guarded by an async mutex, so events of the same user are handled one
//! at a time while different users proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::context::ConversationContext;
use super::scenarios::Step;

type Slot = Arc<Mutex<ConversationContext>>;

/// Per-user conversation slots
#[derive(Debug)]
pub struct StateStorage {
    contexts: DashMap<i64, Slot>,
    default_language: String,
}

impl StateStorage {
    pub fn new(default_language: &str) -> Self {
        Self {
            contexts: DashMap::new(),
            default_language: default_language.to_string(),
        }
    }

    /// The slot of a user, created at `Start` on first contact
    pub fn slot(&self, user_id: i64) -> Slot {
        self.contexts
            .entry(user_id)
            .or_insert_with(|| {
                debug!(user_id = user_id, "Creating conversation context");
                Arc::new(Mutex::new(ConversationContext::new(user_id, &self.default_language)))
            })
            .clone()
    }

    /// Wait for exclusive access to a user's context
    pub async fn lock(&self, user_id: i64) -> OwnedMutexGuard<ConversationContext> {
        // the map guard is released before awaiting
        let slot = self.slot(user_id);
        slot.lock_owned().await
    }

    /// A copy of the user's context, if the user has ever written
    pub async fn snapshot(&self, user_id: i64) -> Option<ConversationContext> {
        let slot = self.contexts.get(&user_id).map(|s| s.value().clone())?;
        let context = slot.lock().await;
        Some(context.clone())
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Counts per step. Slots busy with an event are reported as busy.
    pub fn stats(&self) -> StorageStats {
        let mut stats = StorageStats {
            total_contexts: self.contexts.len(),
            ..Default::default()
        };
        for slot in self.contexts.iter() {
            match slot.value().try_lock() {
                Ok(context) if context.step == Step::MainMenu => stats.idle_contexts += 1,
                Ok(_) => stats.in_workflow_contexts += 1,
                Err(_) => stats.busy_contexts += 1,
            }
        }
        stats
    }
}

/// Storage statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    pub total_contexts: usize,
    pub idle_contexts: usize,
    pub in_workflow_contexts: usize,
    pub busy_contexts: usize,
}
