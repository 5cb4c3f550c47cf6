// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tab and tab group models for storage and API.
//!
//! Field names are camelCase on the wire and in the Firestore document,
//! matching the profile schema the web client reads.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A tracked browser tab stored in the user profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Tab {
    /// Opaque ID, unique within a user's tab set
    pub id: String,
    /// Display title
    pub title: String,
    /// Absolute URL, always carrying an http(s) scheme
    pub url: String,
    /// Favicon URL, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    /// Last-accessed time (epoch millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<i64>,
    /// True for tabs synthesized from a bare URL (AI suggestions, imports)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_placeholder: Option<bool>,
}

/// A named collection of tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TabGroup {
    /// Opaque ID, unique within a user's group set
    pub id: String,
    /// Group name, user- or AI-assigned
    pub name: String,
    /// Member tabs (stored by value, as in the profile document)
    pub tabs: Vec<Tab>,
    /// Optional display color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// True if user-created or user-renamed; false for untouched AI groups
    #[serde(default)]
    pub is_custom: bool,
}

impl TabGroup {
    /// Build the downloadable export artifact for this group.
    pub fn export(&self) -> GroupExport {
        GroupExport {
            name: self.name.clone(),
            tabs: self
                .tabs
                .iter()
                .map(|t| ExportedTab {
                    title: t.title.clone(),
                    url: t.url.clone(),
                })
                .collect(),
        }
    }

    /// File name for the export download: lowercased group name with
    /// whitespace runs collapsed to underscores, plus `_tabs.json`.
    pub fn export_file_name(&self) -> String {
        let mut base = String::with_capacity(self.name.len());
        let mut in_whitespace = false;
        for c in self.name.chars() {
            if c.is_whitespace() {
                if !in_whitespace {
                    base.push('_');
                    in_whitespace = true;
                }
            } else {
                base.extend(c.to_lowercase());
                in_whitespace = false;
            }
        }
        format!("{}_tabs.json", base)
    }
}

/// Exported group artifact: `{ name, tabs: [{title, url}] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GroupExport {
    pub name: String,
    pub tabs: Vec<ExportedTab>,
}

/// A tab inside an export artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExportedTab {
    pub title: String,
    pub url: String,
}

/// Prepend `https://` when the URL carries no explicit http(s) scheme.
pub fn ensure_scheme(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Scheme-normalize and validate a URL.
///
/// Returns the schemed URL when it parses as an absolute URL, `None` when
/// it cannot be parsed even after scheme insertion.
pub fn normalize_url(raw: &str) -> Option<String> {
    let schemed = ensure_scheme(raw);
    url::Url::parse(&schemed).ok().map(|_| schemed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> TabGroup {
        TabGroup {
            id: "g1".to_string(),
            name: name.to_string(),
            tabs: vec![],
            color: None,
            is_custom: true,
        }
    }

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(ensure_scheme("example.com/path"), "https://example.com/path");
        assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
        assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_normalize_url_rejects_garbage() {
        assert_eq!(
            normalize_url("example.com"),
            Some("https://example.com".to_string())
        );
        assert!(normalize_url("not a url").is_none());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(group("Work Stuff").export_file_name(), "work_stuff_tabs.json");
        assert_eq!(group("News").export_file_name(), "news_tabs.json");
        assert_eq!(
            group("A  Very\tSpaced").export_file_name(),
            "a_very_spaced_tabs.json"
        );
    }
}
