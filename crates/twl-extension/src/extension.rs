//! Composition root: wires configuration and host services into the hook
//! handler.

use crate::config::TwlConfig;
use crate::deferred::{deferred_queue, DeferredRunner};
use crate::dispatcher::NotificationDispatcher;
use crate::echo::{CategoryDefinitions, IconDefinitions, NotificationDefinitions};
use crate::hooks::{ExtensionHooks, TwlHooks};
use crate::model::UserIdentity;
use crate::notifier::Notifier;
use crate::preferences::Preferences;
use crate::presentation::TwlEligiblePresentationModel;
use crate::services::{
    Clock, GlobalIdentity, GlobalPreferences, NotificationService, Permissions, SystemClock,
};
use serde::Serialize;
use std::sync::Arc;

/// Builds an [`Extension`].
///
/// Every service except the clock is optional so a wiki without, say, the
/// global preferences extension can still load this one. Without all of them
/// page saves are ignored.
pub struct ExtensionBuilder {
    config: TwlConfig,
    identity: Option<Arc<dyn GlobalIdentity>>,
    preferences: Option<Arc<dyn GlobalPreferences>>,
    notifications: Option<Arc<dyn NotificationService>>,
    permissions: Option<Arc<dyn Permissions>>,
    clock: Arc<dyn Clock>,
}

impl ExtensionBuilder {
    pub fn new(config: TwlConfig) -> Self {
        Self {
            config,
            identity: None,
            preferences: None,
            notifications: None,
            permissions: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn GlobalIdentity>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_preferences(mut self, preferences: Arc<dyn GlobalPreferences>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationService>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn with_permissions(mut self, permissions: Arc<dyn Permissions>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the extension and the runner that executes its deferred updates.
    ///
    /// The caller owns the runner: `tokio::spawn(runner.run())` for a
    /// long-lived worker, or `run_pending()` after each request.
    pub fn build(self) -> (Extension, DeferredRunner) {
        let config = Arc::new(self.config);
        let (deferred, runner) = deferred_queue();

        let services = (self.identity, self.preferences, self.notifications, self.permissions);
        let notifier = match services {
            (None, ..) => Err("GlobalIdentity"),
            (_, None, ..) => Err("GlobalPreferences"),
            (_, _, None, _) => Err("NotificationService"),
            (_, _, _, None) => Err("Permissions"),
            (Some(identity), Some(preferences), Some(notifications), Some(permissions)) => {
                Ok(Arc::new(Notifier::new(
                    config.thresholds(),
                    identity,
                    preferences,
                    permissions,
                    self.clock,
                    NotificationDispatcher::new(notifications),
                )))
            }
        };

        if let Err(missing) = &notifier {
            tracing::warn!(
                missing = *missing,
                "TWL notifications disabled, required service not installed"
            );
        }

        let extension = Extension {
            presentation: TwlEligiblePresentationModel::new(&config),
            active: notifier.is_ok(),
            hooks: Arc::new(TwlHooks::new(Arc::clone(&config), notifier, deferred)),
            config,
        };
        (extension, runner)
    }
}

/// Registration tables as the host would collect them.
#[derive(Debug, Default, Serialize)]
pub struct Registrations {
    pub preferences: Preferences,
    pub notifications: NotificationDefinitions,
    pub categories: CategoryDefinitions,
    pub icons: IconDefinitions,
}

/// A loaded extension.
pub struct Extension {
    config: Arc<TwlConfig>,
    hooks: Arc<TwlHooks>,
    presentation: TwlEligiblePresentationModel,
    active: bool,
}

impl Extension {
    pub fn builder(config: TwlConfig) -> ExtensionBuilder {
        ExtensionBuilder::new(config)
    }

    pub fn config(&self) -> &TwlConfig {
        &self.config
    }

    /// Hook handler to register with the host.
    pub fn hooks(&self) -> Arc<dyn ExtensionHooks> {
        self.hooks.clone()
    }

    /// Presentation model backing `twl-eligible` notifications.
    pub fn presentation_model(&self) -> &TwlEligiblePresentationModel {
        &self.presentation
    }

    /// Whether saves can lead to notifications: enabled and all services present.
    pub fn is_active(&self) -> bool {
        self.active && self.config.send_notifications
    }

    /// Run the registration hooks into fresh tables.
    pub fn registrations(&self, user: &UserIdentity) -> Registrations {
        let mut tables = Registrations::default();
        self.hooks.on_get_preferences(user, &mut tables.preferences);
        self.hooks.on_before_create_echo_event(
            &mut tables.notifications,
            &mut tables.categories,
            &mut tables.icons,
        );
        tables
    }
}
