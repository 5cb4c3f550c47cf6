// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tab-group reconciliation: merging AI-proposed groups into the current
//! group list.
//!
//! The merge policy, in proposal order:
//! - candidate URLs are scheme-normalized, resolved to known tabs, or
//!   materialized as placeholder tabs; unparsable URLs are skipped;
//! - a proposal whose name exactly matches a group extends that group,
//!   adding only tabs that were ungrouped when the pass started;
//! - otherwise a new non-custom group is created from the ungrouped
//!   subset, or dropped when that subset is empty;
//! - a tab claimed by one proposal is unavailable to later ones, so no
//!   tab ever lands in two groups;
//! - empty non-custom groups are pruned at the end.
//!
//! This is a pure function over [`DashboardState`]; committing the result
//! and persisting it are the caller's concern.

use crate::models::state::DashboardState;
use crate::models::tab::{ensure_scheme, Tab, TabGroup};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// An AI group proposal that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Proposed name; either brand-new or an existing group's exact name
    pub group_name: String,
    /// Candidate URLs, possibly unknown or unparsable
    pub tab_urls: Vec<String>,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The full new group list (existing groups possibly extended, new
    /// groups appended, empty non-custom groups pruned)
    pub groups: Vec<TabGroup>,
    /// Placeholder tabs materialized during this pass, to be merged into
    /// the global tab set
    pub new_tabs: Vec<Tab>,
    /// Number of distinct groups created
    pub groups_created: usize,
    /// Number of distinct pre-existing groups that gained at least one tab
    pub groups_updated: usize,
}

/// The four user-facing outcomes of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ReconcileSummary {
    CreatedAndUpdated,
    Created,
    Updated,
    NoChanges,
}

impl ReconcileOutcome {
    pub fn summary(&self) -> ReconcileSummary {
        match (self.groups_created > 0, self.groups_updated > 0) {
            (true, true) => ReconcileSummary::CreatedAndUpdated,
            (true, false) => ReconcileSummary::Created,
            (false, true) => ReconcileSummary::Updated,
            (false, false) => ReconcileSummary::NoChanges,
        }
    }
}

/// Merge `proposals` into `state`'s groups.
///
/// `now_ms` stamps materialized placeholder tabs and seeds the generated
/// ids, keeping the pass deterministic for a given input.
pub fn reconcile(state: &DashboardState, proposals: &[Proposal], now_ms: i64) -> ReconcileOutcome {
    // Snapshot of the tabs eligible for assignment. Placeholders
    // materialized below join this set; every assignment removes from it,
    // which is what enforces at-most-one-group membership.
    let mut available: HashSet<String> = state
        .ungrouped_tabs()
        .iter()
        .map(|t| t.id.clone())
        .collect();

    let mut tabs_by_url: HashMap<String, Tab> = state
        .tabs
        .iter()
        .map(|t| (t.url.clone(), t.clone()))
        .collect();

    let mut groups = state.groups.clone();
    let mut new_tabs: Vec<Tab> = Vec::new();
    let mut placeholder_salt = 0usize;

    let mut created_ids: HashSet<String> = HashSet::new();
    let mut updated_ids: HashSet<String> = HashSet::new();

    for proposal in proposals {
        let candidates = materialize_candidates(
            &proposal.tab_urls,
            now_ms,
            &mut tabs_by_url,
            &mut available,
            &mut new_tabs,
            &mut placeholder_salt,
        );

        if candidates.is_empty() && proposal.group_name.is_empty() {
            continue;
        }

        // Exact case-sensitive name match; first group in iteration order
        // wins when names are duplicated.
        if let Some(existing) = groups.iter_mut().find(|g| g.name == proposal.group_name) {
            let mut added_any = false;
            for tab in candidates {
                let already_member = existing.tabs.iter().any(|t| t.id == tab.id);
                if !already_member && available.remove(&tab.id) {
                    existing.tabs.push(tab);
                    added_any = true;
                }
            }
            if added_any && !created_ids.contains(&existing.id) {
                updated_ids.insert(existing.id.clone());
            }
        } else {
            let members: Vec<Tab> = candidates
                .into_iter()
                .filter(|t| available.remove(&t.id))
                .collect();
            // A proposal whose tabs are all grouped elsewhere is dropped
            // without a report; never create a group with no real tabs.
            if members.is_empty() {
                tracing::debug!(
                    group_name = %proposal.group_name,
                    "Dropping proposal with no assignable tabs"
                );
                continue;
            }
            let group = TabGroup {
                id: format!(
                    "ai-group-{}-{}",
                    now_ms,
                    sanitize_group_id(&proposal.group_name)
                ),
                name: proposal.group_name.clone(),
                tabs: members,
                color: None,
                is_custom: false,
            };
            created_ids.insert(group.id.clone());
            groups.push(group);
        }
    }

    // Applies to pre-existing and newly created groups alike.
    groups.retain(|g| !g.tabs.is_empty() || g.is_custom);

    ReconcileOutcome {
        groups,
        new_tabs,
        groups_created: created_ids.len(),
        groups_updated: updated_ids.len(),
    }
}

/// Resolve a proposal's candidate URLs into tabs.
///
/// Known URLs (matched on the original or schemed form) resolve to their
/// existing tab; unknown-but-parsable URLs materialize a placeholder tab;
/// unparsable URLs are skipped. One bad URL never fails the batch.
fn materialize_candidates(
    urls: &[String],
    now_ms: i64,
    tabs_by_url: &mut HashMap<String, Tab>,
    available: &mut HashSet<String>,
    new_tabs: &mut Vec<Tab>,
    placeholder_salt: &mut usize,
) -> Vec<Tab> {
    let mut candidates: Vec<Tab> = Vec::new();

    for raw in urls {
        if raw.is_empty() {
            continue;
        }
        let schemed = ensure_scheme(raw);

        let tab = match tabs_by_url.get(raw).or_else(|| tabs_by_url.get(&schemed)) {
            Some(known) => known.clone(),
            None => match url::Url::parse(&schemed) {
                Ok(parsed) => {
                    let host = parsed.host_str().unwrap_or("tab").to_string();
                    *placeholder_salt += 1;
                    let placeholder = Tab {
                        id: format!("ai-tab-{}-{}-{}", host, now_ms, placeholder_salt),
                        title: host,
                        url: schemed.clone(),
                        favicon_url: None,
                        last_accessed: Some(now_ms),
                        is_placeholder: Some(true),
                    };
                    tabs_by_url.insert(schemed.clone(), placeholder.clone());
                    available.insert(placeholder.id.clone());
                    new_tabs.push(placeholder.clone());
                    placeholder
                }
                Err(err) => {
                    tracing::debug!(url = %raw, error = %err, "Skipping unparsable suggested URL");
                    continue;
                }
            },
        };

        if !candidates.iter().any(|t| t.id == tab.id) {
            candidates.push(tab);
        }
    }

    candidates
}

/// Reduce a proposed group name to an id-safe fragment.
fn sanitize_group_id(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_group_id() {
        assert_eq!(sanitize_group_id("Work Stuff"), "work-stuff");
        assert_eq!(sanitize_group_id("  News!! "), "news");
        assert_eq!(sanitize_group_id("a/b/c"), "a-b-c");
        assert_eq!(sanitize_group_id(""), "");
    }
}
