//! Conversation handlers module
//!
//! This module contains the conversation engine and one handler per step:
//! - `engine` serializes events per user and applies global shortcuts
//! - `common` holds the handler trait, its context and the dispatch table
//! - the remaining modules implement the workflows

pub mod adding;
pub mod common;
pub mod deleting;
pub mod editing;
pub mod engine;
pub mod fallback;
pub mod menu;
pub mod planning;
pub mod queries;
pub mod source;
pub mod start;

// Re-export commonly used handler components
pub use common::{HandlerContext, HandlerRegistry, StepHandler};
pub use engine::ConversationEngine;
pub use queries::CatalogQuery;
