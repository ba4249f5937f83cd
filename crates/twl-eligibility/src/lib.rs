//! TWL Eligibility
//!
//! Decides when a user should be invited to The Wikipedia Library and makes
//! sure the invitation goes out once.
//!
//! # Eligibility
//!
//! An account qualifies once its global edit count and its account age both
//! reach the configured thresholds (500 edits and 180 days by default).
//!
//! # Notified Flag
//!
//! Whether a user was already invited lives in an external store as a
//! tri-state flag that only moves forward:
//!
//! ```text
//! Unset ──▶ No ──▶ Yes
//! ```
//!
//! The first trigger for a user only records `No`. A later trigger that finds
//! `No` and an eligible account writes `Yes`, and only a successful write
//! allows the notification. Triggers racing through the `No` step can still
//! both notify; the protocol is best effort.

mod eligibility;
mod error;
mod flag;
mod machine;

pub use eligibility::{
    is_eligible, AccountAge, AccountStats, EligibilityThresholds, DEFAULT_MIN_ACCOUNT_AGE_DAYS,
    DEFAULT_MIN_EDIT_COUNT, SECONDS_PER_DAY,
};
pub use error::{Error, Result};
pub use flag::{NotifiedFlag, PREFERENCE_KEY};
pub use machine::{FlagStore, NotificationStateMachine, Outcome};
