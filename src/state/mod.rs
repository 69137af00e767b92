//! State management module
//!
//! This module handles conversation state and user context

pub mod context;
pub mod scenarios;
pub mod storage;

// Re-export commonly used state components
pub use context::{ContextSummary, ConversationContext};
pub use scenarios::{ScenarioManager, Step, Workflow};
pub use storage::{StateStorage, StorageStats};
