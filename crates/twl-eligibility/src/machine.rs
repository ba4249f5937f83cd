//! Two-phase notified-flag protocol.
//!
//! Each trigger for a user runs one [`NotificationStateMachine::advance`]:
//!
//! | stored  | action                                   | outcome           |
//! |---------|------------------------------------------|-------------------|
//! | `Yes`   | nothing                                  | `AlreadyNotified` |
//! | `Unset` | write `No`, result ignored               | `Deferred`        |
//! | `No`    | ineligible: nothing                      | `Ineligible`      |
//! | `No`    | eligible: write `Yes`                    | `Notify` / `WriteFailed` |
//!
//! Only a successful `Yes` write may lead to a notification. The read and the
//! `Yes` write are not atomic, so two triggers racing through the `No` row can
//! both notify. That window is accepted; there is no lock here.

use crate::eligibility::{AccountStats, EligibilityThresholds};
use crate::error::Result;
use crate::flag::NotifiedFlag;
use tracing::{debug, trace, warn};

/// Read and conditional write of one user's flag.
///
/// Implementations are bound to a single user and handle the string codec.
pub trait FlagStore {
    /// Current flag. An error aborts the transition without any write.
    fn read(&self) -> Result<NotifiedFlag>;

    /// Persist `flag`. Returns whether the store accepted the write.
    fn write(&self, flag: NotifiedFlag) -> bool;
}

/// Result of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Flag was already `Yes`.
    AlreadyNotified,
    /// Flag was `Unset`; `No` was written (or attempted). Re-evaluated next trigger.
    Deferred {
        /// Whether the `No` write was accepted.
        recorded: bool,
    },
    /// Flag was `No` and the account does not cross the thresholds.
    Ineligible,
    /// Flag was `No`, account eligible, but the `Yes` write failed.
    WriteFailed,
    /// Flag moved `No → Yes`. The caller dispatches exactly one notification.
    Notify,
}

impl Outcome {
    /// Whether the caller should dispatch a notification.
    pub const fn should_notify(self) -> bool {
        matches!(self, Self::Notify)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyNotified => write!(f, "already notified"),
            Self::Deferred { .. } => write!(f, "deferred"),
            Self::Ineligible => write!(f, "ineligible"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::Notify => write!(f, "notify"),
        }
    }
}

/// Drives the flag protocol against a set of thresholds.
#[derive(Debug, Clone, Copy)]
pub struct NotificationStateMachine<'a> {
    thresholds: &'a EligibilityThresholds,
}

impl<'a> NotificationStateMachine<'a> {
    /// Create a machine judging eligibility against `thresholds`.
    pub const fn new(thresholds: &'a EligibilityThresholds) -> Self {
        Self { thresholds }
    }

    /// Run one transition.
    ///
    /// `fetch_stats` is only called when the stored flag is `No`, so account
    /// figures are always fresh for the decision that can notify.
    pub fn advance<S, F>(&self, store: &S, fetch_stats: F) -> Result<Outcome>
    where
        S: FlagStore + ?Sized,
        F: FnOnce() -> Result<AccountStats>,
    {
        let current = store.read()?;
        trace!(flag = %current, "read notified flag");

        if current.is_terminal() {
            return Ok(Outcome::AlreadyNotified);
        }
        match current {
            NotifiedFlag::Unset => {
                let recorded = record(store, current, NotifiedFlag::No);
                if !recorded {
                    debug!("could not record notified=no, will retry on next trigger");
                }
                Ok(Outcome::Deferred { recorded })
            }
            _ => {
                let stats = fetch_stats()?;
                if !stats.is_eligible(self.thresholds) {
                    trace!(
                        edit_count = stats.edit_count,
                        age = stats.age.seconds(),
                        "account below thresholds"
                    );
                    return Ok(Outcome::Ineligible);
                }
                if record(store, current, NotifiedFlag::Yes) {
                    Ok(Outcome::Notify)
                } else {
                    warn!("could not record notified=yes, skipping notification");
                    Ok(Outcome::WriteFailed)
                }
            }
        }
    }
}

/// Write `to` only if it is the next state after `from`.
fn record<S: FlagStore + ?Sized>(store: &S, from: NotifiedFlag, to: NotifiedFlag) -> bool {
    if !from.can_advance_to(to) {
        warn!(%from, %to, "refusing out-of-order flag write");
        return false;
    }
    store.write(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::AccountAge;
    use crate::error::Error;
    use std::cell::{Cell, RefCell};

    /// Flag store with scripted failures and a write log.
    #[derive(Default)]
    struct ScriptedStore {
        flag: Cell<NotifiedFlag>,
        fail_reads: Cell<bool>,
        reject_writes: Cell<bool>,
        writes: RefCell<Vec<NotifiedFlag>>,
    }

    impl ScriptedStore {
        fn with(flag: NotifiedFlag) -> Self {
            let store = Self::default();
            store.flag.set(flag);
            store
        }
    }

    impl FlagStore for ScriptedStore {
        fn read(&self) -> Result<NotifiedFlag> {
            if self.fail_reads.get() {
                return Err(Error::Store("replica down".into()));
            }
            Ok(self.flag.get())
        }

        fn write(&self, flag: NotifiedFlag) -> bool {
            self.writes.borrow_mut().push(flag);
            if self.reject_writes.get() {
                return false;
            }
            self.flag.set(flag);
            true
        }
    }

    fn thresholds() -> EligibilityThresholds {
        EligibilityThresholds::from_days(2, 180)
    }

    fn eligible() -> Result<AccountStats> {
        Ok(AccountStats { edit_count: 2, age: AccountAge::from_days(365) })
    }

    fn ineligible() -> Result<AccountStats> {
        Ok(AccountStats { edit_count: 1, age: AccountAge::from_days(365) })
    }

    #[test]
    fn new_user_is_deferred_then_notified() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::default();

        let first = machine.advance(&store, eligible).unwrap();
        assert_eq!(first, Outcome::Deferred { recorded: true });
        assert_eq!(*store.writes.borrow(), vec![NotifiedFlag::No]);

        let second = machine.advance(&store, eligible).unwrap();
        assert_eq!(second, Outcome::Notify);
        assert_eq!(*store.writes.borrow(), vec![NotifiedFlag::No, NotifiedFlag::Yes]);
    }

    #[test]
    fn repeated_triggers_notify_once() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::default();

        let notified = (0..12)
            .map(|_| machine.advance(&store, eligible).unwrap())
            .filter(|o| o.should_notify())
            .count();

        assert_eq!(notified, 1);
        let yes_writes = store.writes.borrow().iter().filter(|f| **f == NotifiedFlag::Yes).count();
        assert_eq!(yes_writes, 1);
        assert_eq!(store.flag.get(), NotifiedFlag::Yes);
    }

    #[test]
    fn ineligible_user_only_gets_no() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::default();

        for _ in 0..5 {
            let outcome = machine.advance(&store, ineligible).unwrap();
            assert!(!outcome.should_notify());
        }
        assert_eq!(*store.writes.borrow(), vec![NotifiedFlag::No]);
        assert_eq!(store.flag.get(), NotifiedFlag::No);
    }

    #[test]
    fn unset_does_not_look_at_account() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::default();

        let outcome = machine
            .advance(&store, || panic!("stats must not be fetched for an unset flag"))
            .unwrap();
        assert_eq!(outcome, Outcome::Deferred { recorded: true });
    }

    #[test]
    fn yes_is_terminal() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::with(NotifiedFlag::Yes);

        assert_eq!(machine.advance(&store, eligible).unwrap(), Outcome::AlreadyNotified);
        assert_eq!(machine.advance(&store, ineligible).unwrap(), Outcome::AlreadyNotified);
        assert!(store.writes.borrow().is_empty());
    }

    #[test]
    fn read_failure_aborts_without_writing() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::with(NotifiedFlag::No);
        store.fail_reads.set(true);

        assert!(machine.advance(&store, eligible).is_err());
        assert!(store.writes.borrow().is_empty());
    }

    #[test]
    fn failed_no_write_still_defers() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::default();
        store.reject_writes.set(true);

        let outcome = machine.advance(&store, eligible).unwrap();
        assert_eq!(outcome, Outcome::Deferred { recorded: false });
        assert_eq!(store.flag.get(), NotifiedFlag::Unset);
    }

    #[test]
    fn failed_yes_write_does_not_notify() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::with(NotifiedFlag::No);
        store.reject_writes.set(true);

        let outcome = machine.advance(&store, eligible).unwrap();
        assert_eq!(outcome, Outcome::WriteFailed);
        assert!(!outcome.should_notify());

        // Store recovers: next trigger notifies.
        store.reject_writes.set(false);
        assert_eq!(machine.advance(&store, eligible).unwrap(), Outcome::Notify);
    }

    #[test]
    fn account_lookup_failure_aborts() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::with(NotifiedFlag::No);

        let result = machine.advance(&store, || Err(Error::Account("timeout".into())));
        assert!(matches!(result, Err(Error::Account(_))));
        assert!(store.writes.borrow().is_empty());
    }

    #[test]
    fn flag_never_regresses() {
        let t = thresholds();
        let machine = NotificationStateMachine::new(&t);
        let store = ScriptedStore::default();

        let mut previous = store.flag.get();
        for round in 0..20 {
            let stats = if round % 3 == 0 { ineligible } else { eligible };
            machine.advance(&store, stats).unwrap();
            let now = store.flag.get();
            assert!(now >= previous, "flag went from {} to {}", previous, now);
            previous = now;
        }
        assert_eq!(previous, NotifiedFlag::Yes);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(format!("{}", Outcome::Notify), "notify");
        assert_eq!(format!("{}", Outcome::Deferred { recorded: false }), "deferred");
        assert_eq!(format!("{}", Outcome::AlreadyNotified), "already notified");
    }

    #[test]
    fn out_of_order_write_is_refused() {
        let store = ScriptedStore::default();

        assert!(!record(&store, NotifiedFlag::Unset, NotifiedFlag::Yes));
        assert!(!record(&store, NotifiedFlag::Yes, NotifiedFlag::No));
        assert!(store.writes.borrow().is_empty());

        assert!(record(&store, NotifiedFlag::Unset, NotifiedFlag::No));
        assert_eq!(*store.writes.borrow(), vec![NotifiedFlag::No]);
    }
}
