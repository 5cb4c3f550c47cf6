// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Suggestion requester: wire contracts for the AI collaborators, the
//! boundary validation of their duck-typed responses, and the required
//! no-ungrouped-tabs fast path.

use crate::error::AppError;
use crate::models::settings::UserSettings;
use crate::models::state::DashboardState;
use crate::services::reconcile::Proposal;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serialized view of an existing group, as the suggestion service sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingGroupView {
    pub group_name: String,
    pub tab_urls: Vec<String>,
    pub is_custom: bool,
}

/// Request payload for the grouping suggestion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSuggestionRequest {
    pub ungrouped_urls: Vec<String>,
    pub existing_groups: Vec<ExistingGroupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

/// Request payload for the inactive-tab closure service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveSuggestionRequest {
    /// JSON blob of `[{title, url, lastAccessed}]`
    pub tab_activity_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<String>,
}

/// Inactive-tab closure suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveSuggestions {
    pub tabs_to_close: Vec<String>,
    pub reasoning: String,
}

/// Result of validating an API credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The black-box suggestion collaborator.
///
/// Implementations wrap an LLM backend; tests substitute a mock. Failures
/// must surface as [`AppError::SuggestionApi`], never be swallowed.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Propose tab groups. Returns the raw, unvalidated response items;
    /// callers pass them through [`validate_proposals`].
    async fn suggest_groups(
        &self,
        api_key: &str,
        request: &GroupSuggestionRequest,
    ) -> Result<Vec<Value>, AppError>;

    /// Suggest inactive tabs to close.
    async fn suggest_inactive(
        &self,
        api_key: &str,
        request: &InactiveSuggestionRequest,
    ) -> Result<InactiveSuggestions, AppError>;

    /// Check whether an API credential works at all.
    async fn validate_api_key(&self, api_key: &str) -> Result<KeyValidation, AppError>;
}

/// Build the grouping request from the current state.
pub fn build_group_request(state: &DashboardState, locale: &str) -> GroupSuggestionRequest {
    GroupSuggestionRequest {
        ungrouped_urls: state
            .ungrouped_tabs()
            .iter()
            .map(|t| t.url.clone())
            .collect(),
        existing_groups: state
            .groups
            .iter()
            .map(|g| ExistingGroupView {
                group_name: g.name.clone(),
                tab_urls: g.tabs.iter().map(|t| t.url.clone()).collect(),
                is_custom: g.is_custom,
            })
            .collect(),
        target_language: if locale.is_empty() {
            None
        } else {
            Some(locale.to_string())
        },
    }
}

/// Request group suggestions for the current state.
///
/// The empty-ungrouped fast path is part of the backend's contract, not
/// an optimization: with no ungrouped URLs this returns `[]` without any
/// network call.
pub async fn request_group_suggestions(
    backend: &dyn SuggestionBackend,
    api_key: &str,
    state: &DashboardState,
    locale: &str,
) -> Result<Vec<ProposalValidation>, AppError> {
    let request = build_group_request(state, locale);
    if request.ungrouped_urls.is_empty() {
        return Ok(Vec::new());
    }
    let raw = backend.suggest_groups(api_key, &request).await?;
    Ok(validate_proposals(raw))
}

/// Build the inactive-tab request from the current state and settings.
pub fn build_inactive_request(
    state: &DashboardState,
    settings: &UserSettings,
) -> Result<InactiveSuggestionRequest, AppError> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct TabActivity<'a> {
        title: &'a str,
        url: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_accessed: Option<i64>,
    }

    let activity: Vec<TabActivity<'_>> = state
        .tabs
        .iter()
        .map(|t| TabActivity {
            title: &t.title,
            url: &t.url,
            last_accessed: t.last_accessed,
        })
        .collect();

    let tab_activity_data = serde_json::to_string(&activity)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize activity: {}", e)))?;

    Ok(InactiveSuggestionRequest {
        tab_activity_data,
        user_preferences: if settings.ai_preferences.is_empty() {
            None
        } else {
            Some(settings.ai_preferences.clone())
        },
    })
}

// ─── Response boundary validation ────────────────────────────────

/// Why a raw proposal was rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotAnObject,
    GroupNameNotAString,
    TabUrlsNotAnArray,
}

/// A raw proposal that failed validation; kept for diagnostics only.
#[derive(Debug, Clone)]
pub struct RejectedProposal {
    pub reason: RejectReason,
    pub raw: Value,
}

/// A boundary-validated proposal: either usable or rejected.
#[derive(Debug, Clone)]
pub enum ProposalValidation {
    Valid(Proposal),
    Rejected(RejectedProposal),
}

/// Validate the duck-typed response items against the expected shape.
///
/// `groupName` must be a string (possibly empty; the reconciler handles
/// the empty-name case) and `tabUrls` must be an array. Non-string and
/// empty entries inside `tabUrls` are dropped here.
pub fn validate_proposals(raw: Vec<Value>) -> Vec<ProposalValidation> {
    raw.into_iter()
        .map(|item| {
            let Some(obj) = item.as_object() else {
                return ProposalValidation::Rejected(RejectedProposal {
                    reason: RejectReason::NotAnObject,
                    raw: item,
                });
            };
            let Some(group_name) = obj.get("groupName").and_then(Value::as_str) else {
                return ProposalValidation::Rejected(RejectedProposal {
                    reason: RejectReason::GroupNameNotAString,
                    raw: item,
                });
            };
            let Some(urls) = obj.get("tabUrls").and_then(Value::as_array) else {
                return ProposalValidation::Rejected(RejectedProposal {
                    reason: RejectReason::TabUrlsNotAnArray,
                    raw: item,
                });
            };
            let tab_urls: Vec<String> = urls
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            ProposalValidation::Valid(Proposal {
                group_name: group_name.to_string(),
                tab_urls,
            })
        })
        .collect()
}

/// Keep the valid proposals, logging rejected ones at debug level.
/// Item-level rejects are diagnostics, never user-facing errors.
pub fn keep_valid(validations: Vec<ProposalValidation>) -> Vec<Proposal> {
    let mut proposals = Vec::with_capacity(validations.len());
    for validation in validations {
        match validation {
            ProposalValidation::Valid(p) => proposals.push(p),
            ProposalValidation::Rejected(r) => {
                tracing::debug!(reason = ?r.reason, raw = %r.raw, "Rejected malformed proposal");
            }
        }
    }
    proposals
}
