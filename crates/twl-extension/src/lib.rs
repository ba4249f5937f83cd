//! The Wikipedia Library - Eligibility Notifications
//!
//! Invites experienced editors to The Wikipedia Library. After every page
//! save the extension checks, off the request path, whether the editor's
//! global account has crossed the edit-count and age thresholds, and sends a
//! one-time notification when it has.
//!
//! # Architecture
//!
//! - **Hooks**: [`ExtensionHooks`], one method per host event, implemented by [`TwlHooks`]
//! - **Deferred updates**: tokio work queue that runs checks after the save returns
//! - **Notifier**: account filters (system, bot, unattached) and the notified-flag protocol
//! - **Dispatcher**: creates the `twl-eligible` event in the notification subsystem
//! - **Services**: traits for the host's global identity, global preferences,
//!   notifications and permissions
//! - **Memory**: in-memory services for tests and the simulator
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use twl_extension::memory::{
//!     InMemoryIdentity, InMemoryNotifications, InMemoryPreferences, RightsTable,
//! };
//! use twl_extension::{
//!     EditFlags, EditResult, Extension, PageTitle, RevisionId, TwlConfig, UserIdentity,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (extension, runner) = Extension::builder(TwlConfig::from_env()?)
//!         .with_identity(Arc::new(InMemoryIdentity::new()))
//!         .with_preferences(Arc::new(InMemoryPreferences::new()))
//!         .with_notifications(Arc::new(InMemoryNotifications::new()))
//!         .with_permissions(Arc::new(RightsTable::new()))
//!         .build();
//!     let worker = tokio::spawn(runner.run());
//!
//!     extension.hooks().on_page_save_complete(
//!         &PageTitle::new("Sandbox"),
//!         &UserIdentity::new(1, "Alice"),
//!         "typo",
//!         EditFlags::default(),
//!         RevisionId(1),
//!         &EditResult::default(),
//!     );
//!
//!     drop(extension);
//!     worker.await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod deferred;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod extension;
pub mod hooks;
pub mod memory;
pub mod model;
pub mod notifier;
pub mod preferences;
pub mod presentation;
pub mod services;

pub use config::TwlConfig;
pub use deferred::{deferred_queue, DeferredRunner, DeferredUpdates, RunnerStats};
pub use dispatcher::{Delivery, NotificationDispatcher};
pub use echo::{EchoEvent, NotificationDefinition, EVENT_TYPE};
pub use error::{Error, Result};
pub use extension::{Extension, ExtensionBuilder, Registrations};
pub use hooks::{ExtensionHooks, TwlHooks};
pub use model::{AccountKind, EditFlags, EditResult, PageTitle, RevisionId, UserId, UserIdentity};
pub use notifier::{Evaluation, Notifier, SkipReason};
pub use preferences::{PreferenceDefinition, PreferenceFlag, Preferences};
pub use presentation::{Presentation, TwlEligiblePresentationModel};
pub use services::{
    Clock, GlobalAccount, GlobalIdentity, GlobalPreferences, NotificationService, Permissions,
    SystemClock, BOT_RIGHT,
};
pub use twl_eligibility::{EligibilityThresholds, NotifiedFlag, Outcome};
