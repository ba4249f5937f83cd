//! Host services the extension calls out to.
//!
//! Each trait is the whole surface the extension needs from one host
//! extension. Any of them may be missing on a given wiki; see
//! [`ExtensionBuilder`](crate::ExtensionBuilder).

use crate::echo::EchoEvent;
use crate::error::Result;
use crate::model::UserIdentity;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use twl_eligibility::{AccountAge, AccountStats};

/// Right that marks an account as a bot.
pub const BOT_RIGHT: &str = "bot";

/// Centrally stored, cross-wiki key/value preferences.
pub trait GlobalPreferences: Send + Sync {
    /// Value of `key` for `user`, `None` when absent.
    fn get_global_preference(&self, user: &UserIdentity, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`. Returns whether the store accepted it.
    fn set_global_preference(&self, user: &UserIdentity, key: &str, value: &str) -> bool;
}

/// Single sign-on account data aggregated across wikis.
pub trait GlobalIdentity: Send + Sync {
    /// Global account behind the local `user`.
    fn lookup(&self, user: &UserIdentity) -> Result<GlobalAccount>;
}

/// Notification subsystem.
pub trait NotificationService: Send + Sync {
    /// Create one event. Delivery and rendering are the service's business.
    fn create(&self, event: EchoEvent) -> Result<()>;

    /// Whether `user` already holds a notification of `event_type` on this wiki.
    fn has_notification(&self, user: &UserIdentity, event_type: &str) -> Result<bool>;
}

/// User rights lookup.
pub trait Permissions: Send + Sync {
    fn user_has_right(&self, user: &UserIdentity, right: &str) -> bool;
}

/// Source of the current time, in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Global account as reported by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalAccount {
    /// Whether the local account is attached to the global one.
    pub attached: bool,
    /// Edit count summed over all attached wikis.
    pub global_edit_count: u64,
    /// Global registration time, unix seconds. Unknown for some old accounts.
    pub registration: Option<u64>,
}

impl GlobalAccount {
    /// An attached global account.
    pub fn attached(global_edit_count: u64, registration: u64) -> Self {
        Self {
            attached: true,
            global_edit_count,
            registration: Some(registration),
        }
    }

    /// A local account with no global counterpart.
    pub fn unattached() -> Self {
        Self::default()
    }

    /// Figures for the eligibility check at `now`.
    pub fn stats(&self, now: u64) -> AccountStats {
        AccountStats {
            edit_count: self.global_edit_count,
            age: AccountAge::between(self.registration, now),
        }
    }
}
