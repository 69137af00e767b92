//! Conversation context management
//!
//! This module holds one user's position in a conversation together with
//! everything staged for the workflow in progress.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Entry;
use crate::utils::errors::Result;
use super::scenarios::Step;

/// Keys of staged values in [`ConversationContext::data`]
pub mod keys {
    pub const TITLE: &str = "title";
    pub const CATEGORY: &str = "category";
    pub const MIN_PLAYERS: &str = "min_players";
    pub const EDITING_FIELD: &str = "editing_field";
}

/// User conversation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// User ID this context belongs to
    pub user_id: i64,
    /// Current step
    pub step: Step,
    /// Language used for replies
    pub language: String,
    /// Entry being edited
    pub selected_entry: Option<Entry>,
    /// Entry chosen for deletion, editing or planning
    pub selected_entry_id: Option<i64>,
    pub staged_date: Option<NaiveDate>,
    pub staged_time: Option<NaiveTime>,
    /// Staged field values of a new entry and similar free-form data
    pub data: HashMap<String, serde_json::Value>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new conversation context for a user
    pub fn new(user_id: i64, language: &str) -> Self {
        Self {
            user_id,
            step: Step::Start,
            language: language.to_string(),
            selected_entry: None,
            selected_entry_id: None,
            staged_date: None,
            staged_time: None,
            data: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.step = step;
        self.updated_at = Utc::now();
    }

    /// Drop all staged values and selected references
    pub fn clear(&mut self) {
        self.selected_entry = None;
        self.selected_entry_id = None;
        self.staged_date = None;
        self.staged_time = None;
        self.data.clear();
        self.updated_at = Utc::now();
    }

    pub fn has_staged_data(&self) -> bool {
        self.selected_entry.is_some()
            || self.selected_entry_id.is_some()
            || self.staged_date.is_some()
            || self.staged_time.is_some()
            || !self.data.is_empty()
    }

    /// Set data for the current context
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get data from the current context
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        if let Some(value) = self.data.get(key) {
            let result: T = serde_json::from_value(value.clone())?;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// Get string data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    /// Get integer data (convenience method)
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_data::<i64>(key).unwrap_or(None)
    }

    /// Create a summary of the context for logging
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            user_id: self.user_id,
            step: self.step,
            selected_entry_id: self.selected_entry_id,
            data_keys: self.data.keys().cloned().collect(),
            updated_at: self.updated_at,
        }
    }
}

/// Context summary for logging and debugging
#[derive(Debug, Clone, Serialize)]
pub struct ContextSummary {
    pub user_id: i64,
    pub step: Step,
    pub selected_entry_id: Option<i64>,
    pub data_keys: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
