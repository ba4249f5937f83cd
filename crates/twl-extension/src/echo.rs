//! Notification type registration and the event record.

use crate::model::{PageTitle, UserIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event type of the eligibility notification.
pub const EVENT_TYPE: &str = "twl-eligible";

/// Host category: system notices, never emailed.
pub const CATEGORY: &str = "system-noemail";

/// Icon shipped with the extension.
pub const ICON_PATH: &str = "TheWikipediaLibrary/modules/icons/twl-eligible.svg";

/// Registered presentation model name.
pub const PRESENTATION_MODEL: &str = "TwlEligiblePresentationModel";

/// Notification types by id.
pub type NotificationDefinitions = BTreeMap<String, NotificationDefinition>;

/// Notification categories by id. Owned by the host; this extension only
/// refers to an existing one.
pub type CategoryDefinitions = BTreeMap<String, serde_json::Value>;

/// Icons by id.
pub type IconDefinitions = BTreeMap<String, IconDefinition>;

/// How the subsystem finds recipients of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserLocator {
    /// The event's agent receives it.
    EventAgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationGroup {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSection {
    Alert,
    Message,
}

/// One registered notification type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NotificationDefinition {
    pub user_locators: Vec<UserLocator>,
    pub can_notify_agent: bool,
    pub category: String,
    pub group: NotificationGroup,
    pub section: NotificationSection,
    pub presentation_model: String,
}

impl NotificationDefinition {
    /// Definition of `twl-eligible`: sent to the editor themselves, as a message.
    pub fn twl_eligible() -> Self {
        Self {
            user_locators: vec![UserLocator::EventAgent],
            can_notify_agent: true,
            category: CATEGORY.to_string(),
            group: NotificationGroup::Positive,
            section: NotificationSection::Message,
            presentation_model: PRESENTATION_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconDefinition {
    pub path: String,
}

/// Event handed to [`NotificationService::create`](crate::NotificationService::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub agent: UserIdentity,
    pub title: Option<PageTitle>,
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EchoEvent {
    /// The eligibility event for `agent`, in the context of the saved page.
    pub fn twl_eligible(agent: &UserIdentity, title: &PageTitle) -> Self {
        let mut extra = serde_json::Map::new();
        extra.insert("notifyAgent".to_string(), serde_json::Value::Bool(true));
        Self {
            event_type: EVENT_TYPE.to_string(),
            agent: agent.clone(),
            title: Some(title.clone()),
            extra,
        }
    }
}
