//! What the notification shows. Message keys and links only; the
//! notification subsystem does the rendering.

use crate::config::TwlConfig;
use crate::echo::EVENT_TYPE;
use serde::Serialize;

pub const HEADER_MESSAGE: &str = "notification-header-twl-eligiblity";
pub const BODY_MESSAGE: &str = "notification-body-twl-eligiblity";
pub const PRIMARY_LINK_LABEL: &str = "notification-twl-eligiblity-primarylink-text";
pub const SECONDARY_LINK_LABEL: &str = "notification-twl-eligiblity-secondarylink-text";

/// A link on the notification. Labels are message keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub prioritized: bool,
}

/// Everything the subsystem needs to render a `twl-eligible` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub icon_type: &'static str,
    pub header_message: &'static str,
    pub body_message: &'static str,
    pub primary_link: Link,
    pub secondary_links: Vec<Link>,
}

/// Presentation model registered as `TwlEligiblePresentationModel`.
#[derive(Debug, Clone)]
pub struct TwlEligiblePresentationModel {
    primary_url: String,
    secondary_url: String,
}

impl TwlEligiblePresentationModel {
    pub fn new(config: &TwlConfig) -> Self {
        Self {
            primary_url: config.primary_url.clone(),
            secondary_url: config.secondary_url.clone(),
        }
    }

    pub fn icon_type(&self) -> &'static str {
        EVENT_TYPE
    }

    pub fn header_message_key(&self) -> &'static str {
        HEADER_MESSAGE
    }

    pub fn body_message_key(&self) -> &'static str {
        BODY_MESSAGE
    }

    pub fn primary_link(&self) -> Link {
        Link {
            url: self.primary_url.clone(),
            label: PRIMARY_LINK_LABEL,
            description: None,
            icon: None,
            prioritized: false,
        }
    }

    pub fn secondary_links(&self) -> Vec<Link> {
        vec![Link {
            url: self.secondary_url.clone(),
            label: SECONDARY_LINK_LABEL,
            description: Some(String::new()),
            icon: Some("article"),
            prioritized: true,
        }]
    }

    pub fn present(&self) -> Presentation {
        Presentation {
            icon_type: self.icon_type(),
            header_message: self.header_message_key(),
            body_message: self.body_message_key(),
            primary_link: self.primary_link(),
            secondary_links: self.secondary_links(),
        }
    }
}
