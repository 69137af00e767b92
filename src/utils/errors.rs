//! Error handling for GameKeeper
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for GameKeeper application
#[derive(Error, Debug)]
pub enum GameKeeperError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Game not found: {entry_id}")]
    NotFound { entry_id: i64 },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Date and time cannot be in the past")]
    PastDate,

    #[error("Required conversation data is missing: {0}")]
    MissingData(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// A violated input rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must be between {min} and {max} characters, got {actual}")]
    TitleLength { min: usize, max: usize, actual: usize },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("minimum players must be between 1 and 16, got {0}")]
    MinPlayersRange(i32),

    #[error("maximum players must be between 1 and 16, got {0}")]
    MaxPlayersRange(i32),

    #[error("maximum players ({max}) must not be below minimum players ({min})")]
    MaxBelowMin { min: i32, max: i32 },

    #[error("unknown editable field: {0}")]
    UnknownField(String),
}

/// Malformed user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected a date in DD.MM.YYYY format, got '{0}'")]
    Date(String),

    #[error("expected a time in HH:MM format, got '{0}'")]
    Time(String),

    #[error("expected a whole number, got '{0}'")]
    Number(String),
}

/// Result type alias for GameKeeper operations
pub type Result<T> = std::result::Result<T, GameKeeperError>;

impl GameKeeperError {
    /// Storage-layer failures. The conversation keeps its step so the user can retry.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            GameKeeperError::Database(_)
                | GameKeeperError::Migration(_)
                | GameKeeperError::Io(_)
                | GameKeeperError::Serialization(_)
                | GameKeeperError::BackendUnavailable(_)
        )
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            GameKeeperError::Validation(_) => true,
            GameKeeperError::NotFound { .. } => true,
            GameKeeperError::Parse(_) => true,
            GameKeeperError::PastDate => true,
            GameKeeperError::MissingData(_) => true,
            GameKeeperError::Database(_) => true,
            GameKeeperError::Migration(_) => false,
            GameKeeperError::Telegram(_) => true,
            GameKeeperError::Config(_) => false,
            GameKeeperError::InvalidStateTransition { .. } => false,
            GameKeeperError::Serialization(_) => false,
            GameKeeperError::Io(_) => true,
            GameKeeperError::BackendUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GameKeeperError::Validation(_)
            | GameKeeperError::Parse(_)
            | GameKeeperError::PastDate
            | GameKeeperError::NotFound { .. } => ErrorSeverity::Info,
            GameKeeperError::MissingData(_) => ErrorSeverity::Warning,
            GameKeeperError::Migration(_) | GameKeeperError::Config(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
