//! Error types for twl-eligibility.

use thiserror::Error;

/// Result type for twl-eligibility operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a single flag transition.
#[derive(Debug, Error)]
pub enum Error {
    /// The preference store could not be read.
    #[error("preference store unavailable: {0}")]
    Store(String),

    /// The stored flag holds a value this protocol never writes.
    #[error("unrecognized notified flag value: {0:?}")]
    UnrecognizedFlag(String),

    /// Global account figures could not be fetched.
    #[error("account lookup failed: {0}")]
    Account(String),
}
