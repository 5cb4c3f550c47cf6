// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard application state: the tab and group collections plus every
//! manual mutation over them.
//!
//! All mutations uphold two invariants:
//! - a tab belongs to at most one group;
//! - a group with zero tabs survives only when `is_custom` is true.

use crate::models::tab::{normalize_url, Tab, TabGroup};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Errors from state mutations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("URL cannot be parsed: {0}")]
    InvalidUrl(String),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),
}

/// The tab and group collections of one user's dashboard.
///
/// Serde-flattened into the profile document, so the stored field names
/// are `tabs` and `tabGroups`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardState {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default, rename = "tabGroups")]
    pub groups: Vec<TabGroup>,
}

impl DashboardState {
    /// Tabs that are not a member of any group. Derived on every call,
    /// never stored.
    pub fn ungrouped_tabs(&self) -> Vec<&Tab> {
        self.tabs
            .iter()
            .filter(|tab| !self.is_grouped(&tab.id))
            .collect()
    }

    /// Whether the tab is currently a member of any group.
    pub fn is_grouped(&self, tab_id: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.tabs.iter().any(|t| t.id == tab_id))
    }

    fn find_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    /// Drop groups that ended up empty and are not user-claimed.
    fn prune_empty_ai_groups(&mut self) {
        self.groups.retain(|g| !g.tabs.is_empty() || g.is_custom);
    }

    // ─── Tab operations ──────────────────────────────────────────

    /// Add a manually entered tab. The URL is scheme-normalized and must
    /// parse; groups are untouched.
    pub fn add_tab(
        &mut self,
        title: &str,
        url: &str,
        favicon_url: Option<String>,
        now_ms: i64,
    ) -> Result<Tab, StateError> {
        let normalized =
            normalize_url(url).ok_or_else(|| StateError::InvalidUrl(url.to_string()))?;

        let tab = Tab {
            id: format!("manual-{}", uuid::Uuid::new_v4()),
            title: title.to_string(),
            url: normalized,
            favicon_url,
            last_accessed: Some(now_ms),
            is_placeholder: None,
        };
        self.tabs.push(tab.clone());
        Ok(tab)
    }

    /// Batch-import tabs from bare `(title, url)` pairs, e.g. a bookmark
    /// export. Imported tabs are placeholders until seen as real browser
    /// tabs. Unparsable URLs are skipped item-level, never fatal.
    pub fn import_tabs(&mut self, entries: &[(String, String)], now_ms: i64) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();
        for (title, url) in entries {
            let Some(normalized) = normalize_url(url) else {
                tracing::debug!(url = %url, "Skipping import entry with unparsable URL");
                outcome.skipped += 1;
                continue;
            };
            self.tabs.push(Tab {
                id: format!("import-{}", uuid::Uuid::new_v4()),
                title: title.clone(),
                url: normalized,
                favicon_url: None,
                last_accessed: Some(now_ms),
                is_placeholder: Some(true),
            });
            outcome.added += 1;
        }
        outcome
    }

    /// Remove a tab everywhere: from the global list and from any group
    /// membership, pruning groups that become empty and unclaimed.
    pub fn remove_tab(&mut self, tab_id: &str) -> Result<(), StateError> {
        if self.find_tab(tab_id).is_none() {
            return Err(StateError::UnknownTab(tab_id.to_string()));
        }
        self.tabs.retain(|t| t.id != tab_id);
        for group in &mut self.groups {
            group.tabs.retain(|t| t.id != tab_id);
        }
        self.prune_empty_ai_groups();
        Ok(())
    }

    /// Remove every tab whose URL is in `urls` (applying an AI closure
    /// suggestion). Returns the number of tabs removed.
    pub fn remove_tabs_by_url(&mut self, urls: &[String]) -> usize {
        let before = self.tabs.len();
        self.tabs.retain(|t| !urls.contains(&t.url));
        for group in &mut self.groups {
            group.tabs.retain(|t| !urls.contains(&t.url));
        }
        self.prune_empty_ai_groups();
        before - self.tabs.len()
    }

    // ─── Group operations ────────────────────────────────────────

    /// Create an empty user-owned group.
    pub fn create_custom_group(&mut self, name: &str) -> TabGroup {
        let group = TabGroup {
            id: format!("custom-group-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            tabs: vec![],
            color: None,
            is_custom: true,
        };
        self.groups.push(group.clone());
        group
    }

    /// Remove a group entirely. Its member tabs return to the ungrouped
    /// set (they stay in the global tab list).
    pub fn remove_group(&mut self, group_id: &str) -> Result<(), StateError> {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != group_id);
        if self.groups.len() == before {
            return Err(StateError::UnknownGroup(group_id.to_string()));
        }
        Ok(())
    }

    /// Delete every AI-created group (`is_custom == false`). Returns the
    /// number of groups removed.
    pub fn delete_ai_groups(&mut self) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| g.is_custom);
        before - self.groups.len()
    }

    /// Remove one tab from one group's membership, pruning the group if
    /// it becomes empty and unclaimed.
    pub fn remove_tab_from_group(&mut self, group_id: &str, tab_id: &str) -> Result<(), StateError> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| StateError::UnknownGroup(group_id.to_string()))?;
        group.tabs.retain(|t| t.id != tab_id);
        self.prune_empty_ai_groups();
        Ok(())
    }

    /// Move a tab between ungrouped and a group, or between two groups.
    ///
    /// Duplicate membership in the target is guarded; moving a tab onto
    /// its own group is a no-op.
    pub fn move_tab(
        &mut self,
        tab_id: &str,
        source_group: Option<&str>,
        target_group: Option<&str>,
    ) -> Result<(), StateError> {
        if source_group == target_group {
            return Ok(());
        }
        let tab = self
            .find_tab(tab_id)
            .cloned()
            .ok_or_else(|| StateError::UnknownTab(tab_id.to_string()))?;

        if let Some(target_id) = target_group {
            // Resolve the target before touching the source, so a bad
            // target leaves the state unchanged.
            if !self.groups.iter().any(|g| g.id == target_id) {
                return Err(StateError::UnknownGroup(target_id.to_string()));
            }
        }

        if let Some(source_id) = source_group {
            let source = self
                .groups
                .iter_mut()
                .find(|g| g.id == source_id)
                .ok_or_else(|| StateError::UnknownGroup(source_id.to_string()))?;
            source.tabs.retain(|t| t.id != tab_id);
        }

        if let Some(target_id) = target_group {
            let target = self
                .groups
                .iter_mut()
                .find(|g| g.id == target_id)
                .ok_or_else(|| StateError::UnknownGroup(target_id.to_string()))?;
            if !target.tabs.iter().any(|t| t.id == tab_id) {
                target.tabs.push(tab);
            }
        }

        self.prune_empty_ai_groups();
        Ok(())
    }

    /// Rename a group. Editing by a human always claims the group, so
    /// `is_custom` is set unconditionally.
    pub fn rename_group(&mut self, group_id: &str, new_name: &str) -> Result<(), StateError> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| StateError::UnknownGroup(group_id.to_string()))?;
        group.name = new_name.to_string();
        group.is_custom = true;
        Ok(())
    }

    // ─── Reconciliation commit ───────────────────────────────────

    /// Apply a reconciliation result: replace the group list and merge
    /// newly materialized tabs into the global list, skipping ids that
    /// are already present.
    pub fn commit_reconciliation(&mut self, groups: Vec<TabGroup>, new_tabs: Vec<Tab>) {
        self.groups = groups;
        for tab in new_tabs {
            if self.find_tab(&tab.id).is_none() {
                self.tabs.push(tab);
            }
        }
    }
}

/// Result of a batch import.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImportOutcome {
    pub added: usize,
    pub skipped: usize,
}
