//! The `twl-notified` global preference.
//!
//! Strings only exist here; everything past this module sees [`NotifiedFlag`].

use crate::model::UserIdentity;
use crate::services::GlobalPreferences;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use twl_eligibility::{FlagStore, NotifiedFlag, PREFERENCE_KEY};

/// Preference declarations by key.
pub type Preferences = BTreeMap<String, PreferenceDefinition>;

/// How the host exposes a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    /// Readable and writable through the API only; hidden from the form.
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDefinition {
    #[serde(rename = "type")]
    pub kind: PreferenceKind,
}

impl PreferenceDefinition {
    pub fn api() -> Self {
        Self { kind: PreferenceKind::Api }
    }
}

/// One user's notified flag, backed by the global preference service.
pub struct PreferenceFlag<'a> {
    preferences: &'a dyn GlobalPreferences,
    user: &'a UserIdentity,
}

impl<'a> PreferenceFlag<'a> {
    pub fn new(preferences: &'a dyn GlobalPreferences, user: &'a UserIdentity) -> Self {
        Self { preferences, user }
    }
}

impl FlagStore for PreferenceFlag<'_> {
    fn read(&self) -> twl_eligibility::Result<NotifiedFlag> {
        let raw = self
            .preferences
            .get_global_preference(self.user, PREFERENCE_KEY)
            .map_err(|e| twl_eligibility::Error::Store(e.to_string()))?;
        NotifiedFlag::decode(raw.as_deref())
    }

    fn write(&self, flag: NotifiedFlag) -> bool {
        match flag.encode() {
            Some(value) => self
                .preferences
                .set_global_preference(self.user, PREFERENCE_KEY, value),
            None => false,
        }
    }
}
