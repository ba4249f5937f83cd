//! Emits the `twl-eligible` event.

use crate::echo::{EchoEvent, EVENT_TYPE};
use crate::model::{PageTitle, UserIdentity};
use crate::services::NotificationService;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A new event was created.
    Created,
    /// The user already holds the notification on this wiki; nothing created.
    AlreadyPresent,
    /// The subsystem refused or errored. Not retried.
    Failed,
}

/// Hands eligibility events to the notification subsystem.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationService>,
}

impl NotificationDispatcher {
    pub fn new(notifications: Arc<dyn NotificationService>) -> Self {
        Self { notifications }
    }

    /// Notify `user`, with `title` as context, unless they already have it here.
    ///
    /// A failure is logged and dropped. The notified flag stays `Yes` either
    /// way: a lost notification beats a duplicate.
    pub fn dispatch(&self, user: &UserIdentity, title: &PageTitle) -> Delivery {
        match self.notifications.has_notification(user, EVENT_TYPE) {
            Ok(true) => {
                debug!(
                    user = %user.name,
                    id = %user.id,
                    "user has already been notified about The Wikipedia Library"
                );
                return Delivery::AlreadyPresent;
            }
            Ok(false) => {}
            Err(e) => {
                // Lookup is only a guard; the flag already prevents repeats.
                debug!(user = %user.name, error = %e, "could not check existing notifications");
            }
        }

        match self.notifications.create(EchoEvent::twl_eligible(user, title)) {
            Ok(()) => {
                info!(
                    user = %user.name,
                    id = %user.id,
                    page = %title,
                    "sent twl-eligible notification"
                );
                Delivery::Created
            }
            Err(e) => {
                warn!(
                    user = %user.name,
                    id = %user.id,
                    error = %e,
                    "failed to create twl-eligible notification"
                );
                Delivery::Failed
            }
        }
    }
}
