//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod entry;

// Re-export commonly used models
pub use entry::{Category, EditableField, Entry, EntryStatus, NewEntry};
