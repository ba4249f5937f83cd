//! Host hook handlers.

use crate::config::TwlConfig;
use crate::deferred::DeferredUpdates;
use crate::echo::{
    CategoryDefinitions, IconDefinition, IconDefinitions, NotificationDefinition,
    NotificationDefinitions, EVENT_TYPE, ICON_PATH,
};
use crate::model::{EditFlags, EditResult, PageTitle, RevisionId, UserIdentity};
use crate::notifier::Notifier;
use crate::preferences::{PreferenceDefinition, Preferences};
use std::sync::Arc;
use tracing::{debug, trace};
use twl_eligibility::PREFERENCE_KEY;

/// Events the host delivers to the extension, one method each.
pub trait ExtensionHooks: Send + Sync {
    /// A page save finished.
    fn on_page_save_complete(
        &self,
        page: &PageTitle,
        user: &UserIdentity,
        summary: &str,
        flags: EditFlags,
        revision: RevisionId,
        edit_result: &EditResult,
    );

    /// The host is collecting preference declarations.
    fn on_get_preferences(&self, user: &UserIdentity, preferences: &mut Preferences);

    /// The notification subsystem is collecting notification types.
    fn on_before_create_echo_event(
        &self,
        notifications: &mut NotificationDefinitions,
        categories: &mut CategoryDefinitions,
        icons: &mut IconDefinitions,
    );
}

/// The extension's hook handler.
pub struct TwlHooks {
    config: Arc<TwlConfig>,
    notifier: Result<Arc<Notifier>, &'static str>,
    deferred: DeferredUpdates,
}

impl TwlHooks {
    /// `notifier` is `Err(name)` when the host lacks the named service.
    pub(crate) fn new(
        config: Arc<TwlConfig>,
        notifier: Result<Arc<Notifier>, &'static str>,
        deferred: DeferredUpdates,
    ) -> Self {
        Self { config, notifier, deferred }
    }

    /// Schedule an eligibility check for `user` after the current request.
    ///
    /// Returns whether a deferred update was queued.
    pub fn maybe_send_notification(&self, user: &UserIdentity, title: &PageTitle) -> bool {
        let notifier = match &self.notifier {
            Ok(notifier) => Arc::clone(notifier),
            Err(missing) => {
                debug!(
                    missing = *missing,
                    "required service not installed, not checking eligibility"
                );
                return false;
            }
        };

        let user = user.clone();
        let title = title.clone();
        self.deferred.add_callable_update("twl-eligibility", move || {
            let evaluation = notifier.evaluate(&user, &title);
            trace!(user = %user.name, ?evaluation, "eligibility check finished");
        })
    }
}

impl ExtensionHooks for TwlHooks {
    fn on_page_save_complete(
        &self,
        page: &PageTitle,
        user: &UserIdentity,
        _summary: &str,
        _flags: EditFlags,
        revision: RevisionId,
        _edit_result: &EditResult,
    ) {
        if !self.config.send_notifications {
            return;
        }
        trace!(page = %page, revision = revision.0, "page saved");
        self.maybe_send_notification(user, page);
    }

    fn on_get_preferences(&self, _user: &UserIdentity, preferences: &mut Preferences) {
        preferences.insert(PREFERENCE_KEY.to_string(), PreferenceDefinition::api());
    }

    fn on_before_create_echo_event(
        &self,
        notifications: &mut NotificationDefinitions,
        _categories: &mut CategoryDefinitions,
        icons: &mut IconDefinitions,
    ) {
        notifications.insert(EVENT_TYPE.to_string(), NotificationDefinition::twl_eligible());
        icons.insert(
            EVENT_TYPE.to_string(),
            IconDefinition { path: ICON_PATH.to_string() },
        );
    }
}
