//! TWL simulator
//!
//! Wires the extension to in-memory host services and replays page saves by
//! one editor, printing what the notification subsystem received.
//!
//! Usage: `twl-simulate [saves] [global_edits] [account_age_days]`

use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twl_eligibility::{AccountAge, PREFERENCE_KEY};
use twl_extension::memory::{
    InMemoryIdentity, InMemoryNotifications, InMemoryPreferences, ManualClock, RightsTable,
};
use twl_extension::{
    EditFlags, EditResult, Error, Extension, GlobalAccount, GlobalPreferences, PageTitle,
    RevisionId, TwlConfig, UserIdentity,
};

/// Fixed "now" so runs are reproducible.
const NOW: u64 = 1_700_000_000;

/// Positional command line arguments.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    saves: u64,
    global_edits: u64,
    age_days: u64,
}

impl Args {
    /// Parse arguments after the program name. Missing ones take defaults.
    fn parse(args: &[String]) -> twl_extension::Result<Self> {
        Ok(Self {
            saves: positional(args, 0, "saves", 3)?,
            global_edits: positional(args, 1, "global_edits", 600)?,
            age_days: positional(args, 2, "account_age_days", 365)?,
        })
    }

    /// Registration timestamp of an account `age_days` old at [`NOW`].
    fn registration(&self) -> u64 {
        NOW.saturating_sub(AccountAge::from_days(self.age_days).seconds())
    }
}

fn positional(
    args: &[String],
    index: usize,
    key: &'static str,
    default: u64,
) -> twl_extension::Result<u64> {
    match args.get(index) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfig { key, value: raw.clone() }),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "twl_simulate=info,twl_extension=info,twl_eligibility=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = Args::parse(&args)?;

    let config = TwlConfig::from_env()?;
    tracing::info!(
        thresholds = %serde_json::to_string(&config.thresholds())?,
        send_notifications = config.send_notifications,
        "loaded configuration"
    );

    let editor = UserIdentity::new(1, "ExampleEditor");
    let identity = Arc::new(InMemoryIdentity::new());
    identity.insert(&editor, GlobalAccount::attached(args.global_edits, args.registration()));
    let preferences = Arc::new(InMemoryPreferences::new());
    let notifications = Arc::new(InMemoryNotifications::new());

    let (extension, mut runner) = Extension::builder(config)
        .with_identity(identity.clone())
        .with_preferences(preferences.clone())
        .with_notifications(notifications.clone())
        .with_permissions(Arc::new(RightsTable::new()))
        .with_clock(Arc::new(ManualClock::at(NOW)))
        .build();

    println!("Registrations:");
    println!("{}", serde_json::to_string_pretty(&extension.registrations(&editor))?);
    println!();

    let hooks = extension.hooks();
    for save in 1..=args.saves {
        hooks.on_page_save_complete(
            &PageTitle::new("Sandbox"),
            &editor,
            "simulated edit",
            EditFlags::default(),
            RevisionId(save),
            &EditResult::default(),
        );
        // Request done: run its deferred updates.
        runner.run_pending().await;
        identity.record_edit(&editor);

        let flag = preferences.get_global_preference(&editor, PREFERENCE_KEY)?;
        println!(
            "save {:>3}: twl-notified={:<5} notifications={}",
            save,
            flag.as_deref().unwrap_or("unset"),
            notifications.events().len()
        );
    }

    println!();
    if notifications.events().is_empty() {
        println!("No notification sent.");
    } else {
        println!("Notification:");
        println!(
            "{}",
            serde_json::to_string_pretty(&extension.presentation_model().present())?
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_when_no_arguments() {
        let args = Args::parse(&[]).unwrap();
        assert_eq!(args, Args { saves: 3, global_edits: 600, age_days: 365 });
    }

    #[test]
    fn unparseable_argument_is_an_error() {
        let err = Args::parse(&strings(&["5", "lots"])).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig { key: "global_edits", ref value } if value == "lots"
        ));
        assert!(Args::parse(&strings(&["-1"])).is_err());
    }

    #[test]
    fn huge_age_saturates_to_epoch() {
        let args = Args::parse(&strings(&["1", "600", "300000000000000000"])).unwrap();
        assert_eq!(args.registration(), 0);

        let year = Args::parse(&strings(&["1", "600", "365"])).unwrap();
        assert_eq!(year.registration(), NOW - 365 * 86_400);
    }
}
