//! Page saves through the hook, deferred queue and host services.

use std::sync::Arc;
use twl_extension::memory::{
    InMemoryIdentity, InMemoryNotifications, InMemoryPreferences, ManualClock, RightsTable,
};
use twl_extension::{
    DeferredRunner, EditFlags, EditResult, Extension, GlobalAccount, PageTitle, RevisionId,
    TwlConfig, UserIdentity, BOT_RIGHT, EVENT_TYPE,
};
use twl_eligibility::{PREFERENCE_KEY, SECONDS_PER_DAY};

const NOW: u64 = 1_700_000_000;

struct Wiki {
    identity: Arc<InMemoryIdentity>,
    preferences: Arc<InMemoryPreferences>,
    notifications: Arc<InMemoryNotifications>,
    rights: Arc<RightsTable>,
    extension: Extension,
    runner: DeferredRunner,
}

impl Wiki {
    fn new(config: TwlConfig) -> Self {
        let identity = Arc::new(InMemoryIdentity::new());
        let preferences = Arc::new(InMemoryPreferences::new());
        let notifications = Arc::new(InMemoryNotifications::new());
        let rights = Arc::new(RightsTable::new());
        let (extension, runner) = Extension::builder(config)
            .with_identity(identity.clone())
            .with_preferences(preferences.clone())
            .with_notifications(notifications.clone())
            .with_permissions(rights.clone())
            .with_clock(Arc::new(ManualClock::at(NOW)))
            .build();
        Self { identity, preferences, notifications, rights, extension, runner }
    }

    fn save(&self, user: &UserIdentity, revision: u64) {
        self.extension.hooks().on_page_save_complete(
            &PageTitle::new("Help:Sandbox"),
            user,
            "edit",
            EditFlags::default(),
            RevisionId(revision),
            &EditResult::default(),
        );
    }

    /// Save, then run the request's deferred updates.
    async fn save_and_settle(&mut self, user: &UserIdentity, revision: u64) {
        self.save(user, revision);
        self.runner.run_pending().await;
    }

    fn flag(&self, user: &UserIdentity) -> Option<String> {
        self.preferences.value(user, PREFERENCE_KEY)
    }
}

fn low_thresholds() -> TwlConfig {
    TwlConfig { edit_count: 2, registration_days: 180, ..Default::default() }
}

fn eligible(edits: u64) -> GlobalAccount {
    GlobalAccount::attached(edits, NOW - 365 * SECONDS_PER_DAY)
}

#[tokio::test]
async fn eligible_editor_is_notified_once() {
    let mut wiki = Wiki::new(low_thresholds());
    let user = UserIdentity::new(1, "User1");
    wiki.identity.insert(&user, eligible(2));

    wiki.save_and_settle(&user, 1).await;
    assert_eq!(wiki.flag(&user).as_deref(), Some("no"));
    assert!(wiki.notifications.events().is_empty());

    for revision in 2..=12 {
        wiki.save_and_settle(&user, revision).await;
    }

    assert_eq!(wiki.flag(&user).as_deref(), Some("yes"));
    assert_eq!(wiki.notifications.count_for(&user, EVENT_TYPE), 1);
}

#[tokio::test]
async fn ineligible_editor_is_not_notified() {
    let mut wiki = Wiki::new(low_thresholds());
    let user = UserIdentity::new(2, "User2");
    wiki.identity.insert(&user, eligible(1));

    for revision in 1..=5 {
        wiki.save_and_settle(&user, revision).await;
    }

    assert_eq!(wiki.flag(&user).as_deref(), Some("no"));
    assert!(wiki.notifications.events().is_empty());
}

#[tokio::test]
async fn bot_is_never_notified() {
    let mut wiki = Wiki::new(low_thresholds());
    let bot = UserIdentity::new(3, "ExampleBot");
    wiki.identity.insert(&bot, eligible(10_000));
    wiki.rights.grant(&bot, BOT_RIGHT);

    for revision in 1..=5 {
        wiki.save_and_settle(&bot, revision).await;
    }

    assert_eq!(wiki.flag(&bot), None);
    assert!(wiki.notifications.events().is_empty());
}

#[tokio::test]
async fn disabled_extension_does_nothing() {
    let config = TwlConfig { send_notifications: false, ..low_thresholds() };
    let mut wiki = Wiki::new(config);
    let user = UserIdentity::new(1, "User1");
    wiki.identity.insert(&user, eligible(2));

    wiki.save(&user, 1);
    let stats = wiki.runner.run_pending().await;

    assert_eq!(stats.completed, 0);
    assert_eq!(wiki.flag(&user), None);
}

#[tokio::test]
async fn store_outage_delays_but_does_not_lose_notification() {
    let mut wiki = Wiki::new(low_thresholds());
    let user = UserIdentity::new(1, "User1");
    wiki.identity.insert(&user, eligible(2));

    wiki.save_and_settle(&user, 1).await;
    wiki.preferences.set_fail_reads(true);
    wiki.save_and_settle(&user, 2).await;
    assert_eq!(wiki.flag(&user).as_deref(), Some("no"));
    assert!(wiki.notifications.events().is_empty());

    wiki.preferences.set_fail_reads(false);
    wiki.save_and_settle(&user, 3).await;
    assert_eq!(wiki.notifications.count_for(&user, EVENT_TYPE), 1);
}

#[tokio::test]
async fn background_runner_drains_on_shutdown() {
    let wiki = Wiki::new(low_thresholds());
    let Wiki { identity, notifications, preferences, extension, runner, .. } = wiki;
    let user = UserIdentity::new(1, "User1");
    identity.insert(&user, eligible(2));
    preferences.insert(&user, PREFERENCE_KEY, "no");

    let worker = tokio::spawn(runner.run());
    extension.hooks().on_page_save_complete(
        &PageTitle::new("Help:Sandbox"),
        &user,
        "edit",
        EditFlags::default(),
        RevisionId(1),
        &EditResult::default(),
    );
    drop(extension);

    let stats = worker.await.unwrap();
    assert_eq!(stats.completed, 1);
    assert_eq!(notifications.count_for(&user, EVENT_TYPE), 1);
}
