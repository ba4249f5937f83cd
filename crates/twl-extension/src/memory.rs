//! In-memory host services.
//!
//! Used by the simulator and tests. The preference, identity and notification
//! stores can be told to fail so error paths can be driven. Rights and the
//! clock have no error path.

use crate::echo::EchoEvent;
use crate::error::{Error, Result};
use crate::model::{UserId, UserIdentity};
use crate::services::{
    Clock, GlobalAccount, GlobalIdentity, GlobalPreferences, NotificationService, Permissions,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Preferences ---

/// Global preferences keyed by `(user, key)`.
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    values: Mutex<HashMap<(UserId, String), String>>,
    writes: Mutex<Vec<(UserId, String, String)>>,
    fail_reads: AtomicBool,
    reject_writes: AtomicBool,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording a write.
    pub fn insert(&self, user: &UserIdentity, key: &str, value: &str) {
        lock(&self.values).insert((user.id, key.to_string()), value.to_string());
    }

    /// Current value of `key` for `user`.
    pub fn value(&self, user: &UserIdentity, key: &str) -> Option<String> {
        lock(&self.values).get(&(user.id, key.to_string())).cloned()
    }

    /// Every accepted write, in order.
    pub fn writes(&self) -> Vec<(UserId, String, String)> {
        lock(&self.writes).clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

impl GlobalPreferences for InMemoryPreferences {
    fn get_global_preference(&self, user: &UserIdentity, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Preferences("preference store unavailable".into()));
        }
        Ok(self.value(user, key))
    }

    fn set_global_preference(&self, user: &UserIdentity, key: &str, value: &str) -> bool {
        if self.reject_writes.load(Ordering::SeqCst) {
            return false;
        }
        self.insert(user, key, value);
        lock(&self.writes).push((user.id, key.to_string(), value.to_string()));
        true
    }
}

// --- Identity ---

/// Global accounts by local user id. Unknown users are unattached.
#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    accounts: Mutex<HashMap<UserId, GlobalAccount>>,
    lookups: AtomicUsize,
    fail_lookups: AtomicBool,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: &UserIdentity, account: GlobalAccount) {
        lock(&self.accounts).insert(user.id, account);
    }

    /// Bump a user's global edit count.
    pub fn record_edit(&self, user: &UserIdentity) {
        if let Some(account) = lock(&self.accounts).get_mut(&user.id) {
            account.global_edit_count += 1;
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }
}

impl GlobalIdentity for InMemoryIdentity {
    fn lookup(&self, user: &UserIdentity) -> Result<GlobalAccount> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Error::Identity("central accounts unavailable".into()));
        }
        Ok(lock(&self.accounts).get(&user.id).copied().unwrap_or_default())
    }
}

// --- Notifications ---

/// Records created events.
#[derive(Debug, Default)]
pub struct InMemoryNotifications {
    events: Mutex<Vec<EchoEvent>>,
    create_attempts: AtomicUsize,
    fail_creates: AtomicBool,
}

impl InMemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EchoEvent> {
        lock(&self.events).clone()
    }

    /// Number of `event_type` events whose agent is `user`.
    pub fn count_for(&self, user: &UserIdentity, event_type: &str) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| e.agent.id == user.id && e.event_type == event_type)
            .count()
    }

    pub fn create_attempts(&self) -> usize {
        self.create_attempts.load(Ordering::SeqCst)
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }
}

impl NotificationService for InMemoryNotifications {
    fn create(&self, event: EchoEvent) -> Result<()> {
        self.create_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(Error::Notification("event table is read-only".into()));
        }
        lock(&self.events).push(event);
        Ok(())
    }

    fn has_notification(&self, user: &UserIdentity, event_type: &str) -> Result<bool> {
        Ok(self.count_for(user, event_type) > 0)
    }
}

// --- Rights ---

/// Rights granted per user.
#[derive(Debug, Default)]
pub struct RightsTable {
    rights: Mutex<HashMap<UserId, HashSet<String>>>,
}

impl RightsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, user: &UserIdentity, right: &str) {
        lock(&self.rights).entry(user.id).or_default().insert(right.to_string());
    }

    pub fn revoke(&self, user: &UserIdentity, right: &str) {
        if let Some(granted) = lock(&self.rights).get_mut(&user.id) {
            granted.remove(right);
        }
    }
}

impl Permissions for RightsTable {
    fn user_has_right(&self, user: &UserIdentity, right: &str) -> bool {
        lock(&self.rights)
            .get(&user.id)
            .is_some_and(|granted| granted.contains(right))
    }
}

// --- Clock ---

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn at(now: u64) -> Self {
        Self { now: AtomicU64::new(now) }
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::BOT_RIGHT;

    #[test]
    fn preferences_record_accepted_writes_only() {
        let prefs = InMemoryPreferences::new();
        let user = UserIdentity::new(1, "Alice");

        assert!(prefs.set_global_preference(&user, "k", "a"));
        prefs.set_reject_writes(true);
        assert!(!prefs.set_global_preference(&user, "k", "b"));

        assert_eq!(prefs.value(&user, "k").as_deref(), Some("a"));
        assert_eq!(prefs.writes().len(), 1);
    }

    #[test]
    fn unknown_identity_is_unattached() {
        let identity = InMemoryIdentity::new();
        let account = identity.lookup(&UserIdentity::new(9, "Nobody")).unwrap();
        assert!(!account.attached);
        assert_eq!(identity.lookups(), 1);
    }

    #[test]
    fn identity_lookups_can_fail() {
        let identity = InMemoryIdentity::new();
        let user = UserIdentity::new(1, "Alice");
        identity.insert(&user, GlobalAccount::attached(1, 0));
        identity.set_fail_lookups(true);

        assert!(matches!(identity.lookup(&user), Err(Error::Identity(_))));
        identity.set_fail_lookups(false);
        assert!(identity.lookup(&user).unwrap().attached);
        assert_eq!(identity.lookups(), 2);
    }

    #[test]
    fn record_edit_bumps_count() {
        let identity = InMemoryIdentity::new();
        let user = UserIdentity::new(1, "Alice");
        identity.insert(&user, GlobalAccount::attached(1, 0));
        identity.record_edit(&user);
        assert_eq!(identity.lookup(&user).unwrap().global_edit_count, 2);
    }

    #[test]
    fn rights_grant_and_revoke() {
        let rights = RightsTable::new();
        let bot = UserIdentity::new(2, "ExampleBot");

        assert!(!rights.user_has_right(&bot, BOT_RIGHT));
        rights.grant(&bot, BOT_RIGHT);
        assert!(rights.user_has_right(&bot, BOT_RIGHT));
        rights.revoke(&bot, BOT_RIGHT);
        assert!(!rights.user_has_right(&bot, BOT_RIGHT));
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at(100);
        clock.advance(50);
        assert_eq!(clock.now(), 150);
    }
}
