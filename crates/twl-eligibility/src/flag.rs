//! The tri-state "already notified" flag and its string form in the global
//! preference store.

use crate::error::{Error, Result};

/// Global preference key holding the flag.
pub const PREFERENCE_KEY: &str = "twl-notified";

/// Value written by an earlier release once a user had been notified.
const LEGACY_NOTIFIED: &str = "1";

/// Whether a user has been sent the TWL notification.
///
/// Moves only forward: `Unset → No → Yes`. `Yes` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NotifiedFlag {
    /// Nothing stored yet.
    #[default]
    Unset,
    /// Seen by the protocol, not yet notified.
    No,
    /// Notified. Never leaves this state.
    Yes,
}

impl NotifiedFlag {
    /// Decode a stored preference value. `None` means the key is absent.
    pub fn decode(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Self::Unset),
            Some("no") => Ok(Self::No),
            Some("yes") | Some(LEGACY_NOTIFIED) => Ok(Self::Yes),
            Some(other) => Err(Error::UnrecognizedFlag(other.to_string())),
        }
    }

    /// String written to the store, or `None` for `Unset` (never written).
    pub const fn encode(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::No => Some("no"),
            Self::Yes => Some("yes"),
        }
    }

    /// Whether moving from `self` to `next` respects `Unset → No → Yes`.
    pub fn can_advance_to(self, next: NotifiedFlag) -> bool {
        matches!((self, next), (Self::Unset, Self::No) | (Self::No, Self::Yes))
    }

    /// Whether this is the terminal state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl std::fmt::Display for NotifiedFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.encode().unwrap_or("unset"))
    }
}
