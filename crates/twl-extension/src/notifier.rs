//! One deferred evaluation: account filters, flag protocol, dispatch.

use crate::dispatcher::{Delivery, NotificationDispatcher};
use crate::model::{AccountKind, PageTitle, UserIdentity};
use crate::preferences::PreferenceFlag;
use crate::services::{Clock, GlobalIdentity, GlobalPreferences, Permissions, BOT_RIGHT};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use twl_eligibility::{EligibilityThresholds, NotificationStateMachine, Outcome};

/// Why an evaluation stopped before touching the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Anonymous, temporary or system account.
    AccountKind(AccountKind),
    /// Account holds the bot right.
    Bot,
    /// Local account not attached to a global identity.
    Unattached,
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Account type excluded.
    Skipped(SkipReason),
    /// A service failed; nothing written, left for the next trigger.
    Aborted,
    /// Flag protocol finished without notifying.
    Settled(Outcome),
    /// Flag moved to `Yes` and a dispatch was attempted.
    Notified(Delivery),
}

/// Runs evaluations against the host services.
pub struct Notifier {
    thresholds: EligibilityThresholds,
    identity: Arc<dyn GlobalIdentity>,
    preferences: Arc<dyn GlobalPreferences>,
    permissions: Arc<dyn Permissions>,
    clock: Arc<dyn Clock>,
    dispatcher: NotificationDispatcher,
}

impl Notifier {
    pub fn new(
        thresholds: EligibilityThresholds,
        identity: Arc<dyn GlobalIdentity>,
        preferences: Arc<dyn GlobalPreferences>,
        permissions: Arc<dyn Permissions>,
        clock: Arc<dyn Clock>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            thresholds,
            identity,
            preferences,
            permissions,
            clock,
            dispatcher,
        }
    }

    /// Decide whether `user` should be notified now, and notify if so.
    pub fn evaluate(&self, user: &UserIdentity, title: &PageTitle) -> Evaluation {
        if !user.is_named() {
            trace!(user = %user.name, kind = ?user.kind, "skipping non-named account");
            return Evaluation::Skipped(SkipReason::AccountKind(user.kind));
        }
        if self.permissions.user_has_right(user, BOT_RIGHT) {
            trace!(user = %user.name, "skipping bot account");
            return Evaluation::Skipped(SkipReason::Bot);
        }

        match self.identity.lookup(user) {
            Ok(account) if account.attached => {}
            Ok(_) => {
                trace!(user = %user.name, "skipping account without global identity");
                return Evaluation::Skipped(SkipReason::Unattached);
            }
            Err(e) => {
                warn!(user = %user.name, error = %e, "global account lookup failed");
                return Evaluation::Aborted;
            }
        }

        let flag = PreferenceFlag::new(self.preferences.as_ref(), user);
        let machine = NotificationStateMachine::new(&self.thresholds);
        let outcome = machine.advance(&flag, || {
            let account = self
                .identity
                .lookup(user)
                .map_err(|e| twl_eligibility::Error::Account(e.to_string()))?;
            Ok(account.stats(self.clock.now()))
        });

        match outcome {
            Ok(Outcome::Notify) => Evaluation::Notified(self.dispatcher.dispatch(user, title)),
            Ok(outcome) => {
                debug!(user = %user.name, %outcome, "no notification");
                Evaluation::Settled(outcome)
            }
            Err(e) => {
                warn!(user = %user.name, error = %e, "aborting eligibility check");
                Evaluation::Aborted
            }
        }
    }
}
