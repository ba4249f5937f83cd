//! Edit-count and account-age thresholds for TWL eligibility.
//!
//! An account is eligible once both hold:
//! - global edit count ≥ `min_edit_count`
//! - account age ≥ `min_account_age` seconds
//!
//! Nothing here touches a clock or a store. Callers compute the age once with
//! [`AccountAge::between`] and hand plain numbers in.

/// Seconds in one day, used to turn the configured registration days into an age.
pub const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Default minimum global edit count.
pub const DEFAULT_MIN_EDIT_COUNT: u64 = 500;

/// Default minimum account age in days.
pub const DEFAULT_MIN_ACCOUNT_AGE_DAYS: u64 = 180;

/// Process-wide eligibility thresholds. Built once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EligibilityThresholds {
    /// Minimum global edit count.
    pub min_edit_count: u64,
    /// Minimum account age, in seconds.
    pub min_account_age: u64,
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self::from_days(DEFAULT_MIN_EDIT_COUNT, DEFAULT_MIN_ACCOUNT_AGE_DAYS)
    }
}

impl EligibilityThresholds {
    /// Build thresholds from an edit count and a registration period in days.
    pub const fn from_days(min_edit_count: u64, min_account_age_days: u64) -> Self {
        Self {
            min_edit_count,
            min_account_age: min_account_age_days.saturating_mul(SECONDS_PER_DAY),
        }
    }
}

/// Age of an account in whole seconds, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccountAge(pub u64);

impl AccountAge {
    /// Age at `now` of an account registered at `registration` (both unix seconds).
    ///
    /// A registration in the future (clock skew between replicas) clamps to zero.
    /// An unknown registration is treated as "registered now".
    pub fn between(registration: Option<u64>, now: u64) -> Self {
        match registration {
            Some(registered) => Self(now.saturating_sub(registered)),
            None => Self(0),
        }
    }

    /// Build an age from whole days.
    pub const fn from_days(days: u64) -> Self {
        Self(days.saturating_mul(SECONDS_PER_DAY))
    }

    /// Age in seconds.
    pub const fn seconds(self) -> u64 {
        self.0
    }
}

/// Snapshot of the global account figures eligibility is judged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountStats {
    /// Global (cross-wiki) edit count.
    pub edit_count: u64,
    /// Age of the global account.
    pub age: AccountAge,
}

/// Whether an account with `edit_count` edits and `age` crosses both thresholds.
///
/// # Examples
///
/// ```
/// use twl_eligibility::{is_eligible, AccountAge, EligibilityThresholds};
///
/// let thresholds = EligibilityThresholds::from_days(500, 180);
/// assert!(is_eligible(500, AccountAge::from_days(180), &thresholds));
/// assert!(!is_eligible(499, AccountAge::from_days(365), &thresholds));
/// assert!(!is_eligible(10_000, AccountAge::from_days(179), &thresholds));
/// ```
pub const fn is_eligible(
    edit_count: u64,
    age: AccountAge,
    thresholds: &EligibilityThresholds,
) -> bool {
    edit_count >= thresholds.min_edit_count && age.0 >= thresholds.min_account_age
}

impl AccountStats {
    /// Evaluate these stats against `thresholds`.
    pub const fn is_eligible(&self, thresholds: &EligibilityThresholds) -> bool {
        is_eligible(self.edit_count, self.age, thresholds)
    }
}
