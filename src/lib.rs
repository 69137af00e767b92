//! GameKeeper Telegram Bot
//!
//! A chat bot for keeping track of a personal game collection.
//! This library provides the catalog model and its validators, JSON and
//! PostgreSQL storage backends, session planning and the conversation state
//! machine that drives the multi-step workflows, with multi-language support.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod services;
pub mod state;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GameKeeperError, Result};

// Re-export main components for easy access
pub use handlers::ConversationEngine;
pub use i18n::I18n;
pub use services::{BackendKind, BackendRegistry};
pub use state::{ScenarioManager, StateStorage, Step};
pub use transport::{InboundEvent, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
