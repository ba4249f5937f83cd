//! Host entities the extension refers to but does not own.

use serde::{Deserialize, Serialize};

/// Local user id on this wiki.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of account performed an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// A normal named account.
    #[default]
    Registered,
    /// Logged-out editor identified by IP.
    Anonymous,
    /// Auto-created temporary account.
    Temporary,
    /// Maintenance account owned by the software itself.
    System,
}

/// A user as seen by the host's save hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub kind: AccountKind,
}

impl UserIdentity {
    /// A registered user.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            kind: AccountKind::Registered,
        }
    }

    /// Change the account kind.
    #[must_use]
    pub fn with_kind(mut self, kind: AccountKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a named, human-operated account type.
    pub fn is_named(&self) -> bool {
        self.kind == AccountKind::Registered
    }
}

/// Title of the page whose save fired the hook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageTitle(pub String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of the saved revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionId(pub u64);

/// Host edit flags bitfield, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditFlags(pub u32);

/// Summary of what the save changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditResult {
    /// The save created the page.
    pub is_new: bool,
    /// The save produced no change.
    pub is_null_edit: bool,
    /// The save reverted earlier revisions.
    pub is_revert: bool,
}
