//! Per-user settings stored in the profile document.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User configuration, loaded once per session and persisted as a single
/// field of the profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSettings {
    /// Whether inactive tabs should be auto-closed
    #[serde(default)]
    pub auto_close_inactive_tabs: bool,
    /// Inactivity threshold in minutes
    #[serde(default = "default_inactive_threshold")]
    pub inactive_threshold: u32,
    /// Free-text hint passed to the AI flows
    #[serde(default)]
    pub ai_preferences: String,
    /// Gemini API credential used for suggestion calls
    #[serde(default)]
    pub gemini_api_key: String,
    /// UI locale, also the suggestion target-language hint
    #[serde(default = "default_locale")]
    pub locale: String,
    /// UI theme
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_inactive_threshold() -> u32 {
    30
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_theme() -> String {
    "system".to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            auto_close_inactive_tabs: false,
            inactive_threshold: default_inactive_threshold(),
            ai_preferences: String::new(),
            gemini_api_key: String::new(),
            locale: default_locale(),
            theme: default_theme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_initial_profile() {
        let settings = UserSettings::default();
        assert!(!settings.auto_close_inactive_tabs);
        assert_eq!(settings.inactive_threshold, 30);
        assert_eq!(settings.locale, "en");
        assert_eq!(settings.theme, "system");
        assert!(settings.gemini_api_key.is_empty());
    }

    #[test]
    fn test_partial_document_deserializes_with_defaults() {
        let settings: UserSettings = serde_json::from_str(r#"{"locale":"de"}"#).unwrap();
        assert_eq!(settings.locale, "de");
        assert_eq!(settings.inactive_threshold, 30);
        assert_eq!(settings.theme, "system");
    }
}
