//! The per-user profile document.

use crate::models::settings::UserSettings;
use crate::models::state::DashboardState;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One user's entire stored profile: tabs, groups, and settings live as
/// three fields of a single Firestore document, keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    #[serde(flatten)]
    pub dashboard: DashboardState,
    #[serde(default)]
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_field_names() {
        let profile = UserProfile::default();
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("tabs").is_some());
        assert!(json.get("tabGroups").is_some());
        assert!(json.get("settings").is_some());
    }

    #[test]
    fn test_sparse_document_deserializes() {
        // Documents written by older clients may omit any field.
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.dashboard.tabs.is_empty());
        assert!(profile.dashboard.groups.is_empty());
        assert_eq!(profile.settings.locale, "en");
    }
}
