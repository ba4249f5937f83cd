//! Error types for the TWL extension.

use thiserror::Error;

/// Result type for extension operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in extension operations.
///
/// None of these ever reach the host's save path; deferred updates log and
/// drop them.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    /// Global preference service error
    #[error("Preference error: {0}")]
    Preferences(String),

    /// Global identity service error
    #[error("Identity error: {0}")]
    Identity(String),

    /// Notification service error
    #[error("Notification error: {0}")]
    Notification(String),

    /// Flag protocol error
    #[error(transparent)]
    Eligibility(#[from] twl_eligibility::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
