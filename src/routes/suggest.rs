// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI suggestion routes.
//!
//! The grouping route runs the whole pipeline in one request: load a
//! snapshot, call the suggestion backend, reconcile, commit, persist.
//! A per-user in-flight marker rejects a second pass while one is
//! outstanding, so two reconciliations never interleave for a user.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::DashboardState;
use crate::services::reconcile::{reconcile, ReconcileSummary};
use crate::services::suggest::{
    build_inactive_request, keep_valid, request_group_suggestions, InactiveSuggestions,
};
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Suggestion routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/suggest/groups", post(suggest_groups))
        .route("/api/suggest/inactive", post(suggest_inactive))
}

/// Marker that holds a user's in-flight slot until the pass finishes.
struct InFlightGuard<'a> {
    map: &'a DashMap<String, ()>,
    user_id: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(map: &'a DashMap<String, ()>, user_id: &str) -> Result<Self> {
        use dashmap::mapref::entry::Entry;
        match map.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(AppError::SuggestionInFlight),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(Self {
                    map,
                    user_id: user_id.to_string(),
                })
            }
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.user_id);
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuggestGroupsResponse {
    pub dashboard: DashboardState,
    pub groups_created: usize,
    pub groups_updated: usize,
    pub new_tab_count: usize,
    pub summary: ReconcileSummary,
    /// False when the reconciled state could not be saved; the returned
    /// state is still valid for this session.
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Request AI group suggestions and apply them.
async fn suggest_groups(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SuggestGroupsResponse>> {
    let _guard = InFlightGuard::acquire(&state.suggestions_in_flight, &user.user_id)?;

    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;

    let api_key = profile.settings.gemini_api_key.clone();
    if api_key.is_empty() {
        return Err(AppError::BadRequest(
            "Gemini API key is not configured".to_string(),
        ));
    }
    if profile.dashboard.ungrouped_tabs().is_empty() {
        return Err(AppError::BadRequest(
            "There are no ungrouped tabs to organize".to_string(),
        ));
    }

    // A collaborator failure propagates here and aborts the pass before
    // any state was touched.
    let validations = request_group_suggestions(
        state.suggestions.as_ref(),
        &api_key,
        &profile.dashboard,
        &profile.settings.locale,
    )
    .await?;
    let proposals = keep_valid(validations);

    let outcome = reconcile(&profile.dashboard, &proposals, now_millis());
    let summary = outcome.summary();
    let groups_created = outcome.groups_created;
    let groups_updated = outcome.groups_updated;
    let new_tab_count = outcome.new_tabs.len();

    profile
        .dashboard
        .commit_reconciliation(outcome.groups, outcome.new_tabs);

    let persisted = match state.db.upsert_profile(&user.user_id, &profile).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(user_id = %user.user_id, error = %err, "Failed to persist reconciled state");
            false
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        groups_created,
        groups_updated,
        new_tab_count,
        persisted,
        "Suggestion pass applied"
    );

    Ok(Json(SuggestGroupsResponse {
        dashboard: profile.dashboard,
        groups_created,
        groups_updated,
        new_tab_count,
        summary,
        persisted,
        warning: if persisted {
            None
        } else {
            Some("Changes could not be saved and apply to this session only".to_string())
        },
    }))
}

/// Request inactive-tab closure suggestions. Read-only: applying the
/// picks goes through `POST /api/tabs/close`.
async fn suggest_inactive(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<InactiveSuggestions>> {
    let profile = state.db.get_or_create_profile(&user.user_id).await?;

    let api_key = profile.settings.gemini_api_key.clone();
    if api_key.is_empty() {
        return Err(AppError::BadRequest(
            "Gemini API key is not configured".to_string(),
        ));
    }
    if profile.dashboard.tabs.is_empty() {
        return Err(AppError::BadRequest(
            "There are no tabs to analyze".to_string(),
        ));
    }

    let request = build_inactive_request(&profile.dashboard, &profile.settings)?;
    let suggestions = state
        .suggestions
        .suggest_inactive(&api_key, &request)
        .await?;

    Ok(Json(suggestions))
}
