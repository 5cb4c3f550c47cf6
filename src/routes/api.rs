// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the dashboard: profile loading, tab and group
//! mutations, group export, account deletion.
//!
//! Every mutation follows the same cycle: load the profile document,
//! apply the state operation, persist the whole document. A persistence
//! failure turns into an error response before anything was replaced
//! server-side, so state is never left half-applied.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::state::ImportOutcome;
use crate::models::{DashboardState, Tab, TabGroup, UserProfile};
use crate::routes::state_error;
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/tabs", post(add_tab))
        .route("/api/tabs/import", post(import_tabs))
        .route("/api/tabs/close", post(close_tabs))
        .route("/api/tabs/{id}", delete(remove_tab))
        .route("/api/tabs/{id}/move", post(move_tab))
        .route("/api/groups", post(create_group))
        .route("/api/groups/ai", delete(delete_ai_groups))
        .route("/api/groups/{id}", delete(remove_group))
        .route("/api/groups/{id}/rename", post(rename_group))
        .route("/api/groups/{id}/export", get(export_group))
        .route("/api/groups/{id}/tabs/{tab_id}", delete(remove_tab_from_group))
        .route("/api/account", delete(delete_account))
        .route("/api/account/reset", post(reset_account))
}

// ─── Profile ─────────────────────────────────────────────────

/// Get the user's profile, creating the default document on first login.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state.db.get_or_create_profile(&user.user_id).await?;
    Ok(Json(profile))
}

// ─── Tabs ────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct AddTabRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: String,
    #[validate(length(min = 1, message = "url must not be empty"))]
    url: String,
    favicon_url: Option<String>,
}

/// Add a manually entered tab. Groups are untouched.
async fn add_tab(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddTabRequest>,
) -> Result<Json<Tab>> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    let tab = profile
        .dashboard
        .add_tab(
            &payload.title,
            &payload.url,
            payload.favicon_url,
            now_millis(),
        )
        .map_err(state_error)?;
    state.db.upsert_profile(&user.user_id, &profile).await?;

    tracing::info!(user_id = %user.user_id, tab_id = %tab.id, "Tab added");
    Ok(Json(tab))
}

#[derive(Deserialize, Validate)]
struct ImportTabsRequest {
    #[validate(length(min = 1, message = "tabs must not be empty"))]
    tabs: Vec<ImportedTab>,
}

#[derive(Deserialize, Serialize)]
struct ImportedTab {
    title: String,
    url: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImportTabsResponse {
    pub added: usize,
    pub skipped: usize,
    pub dashboard: DashboardState,
}

/// Batch-import tabs (e.g. from a bookmark export). Entries with
/// unparsable URLs are skipped, never fatal to the batch.
async fn import_tabs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ImportTabsRequest>,
) -> Result<Json<ImportTabsResponse>> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let entries: Vec<(String, String)> = payload
        .tabs
        .into_iter()
        .map(|t| (t.title, t.url))
        .collect();

    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    let ImportOutcome { added, skipped } = profile.dashboard.import_tabs(&entries, now_millis());
    state.db.upsert_profile(&user.user_id, &profile).await?;

    tracing::info!(user_id = %user.user_id, added, skipped, "Tabs imported");
    Ok(Json(ImportTabsResponse {
        added,
        skipped,
        dashboard: profile.dashboard,
    }))
}

#[derive(Deserialize, Validate)]
struct CloseTabsRequest {
    #[validate(length(min = 1, message = "urls must not be empty"))]
    urls: Vec<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CloseTabsResponse {
    pub removed: usize,
    pub dashboard: DashboardState,
}

/// Remove tabs by URL (applying AI closure picks).
async fn close_tabs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CloseTabsRequest>,
) -> Result<Json<CloseTabsResponse>> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    let removed = profile.dashboard.remove_tabs_by_url(&payload.urls);
    state.db.upsert_profile(&user.user_id, &profile).await?;

    tracing::info!(user_id = %user.user_id, removed, "Tabs closed");
    Ok(Json(CloseTabsResponse {
        removed,
        dashboard: profile.dashboard,
    }))
}

/// Remove a tab globally (and from any group membership).
async fn remove_tab(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(tab_id): Path<String>,
) -> Result<Json<DashboardState>> {
    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    profile.dashboard.remove_tab(&tab_id).map_err(state_error)?;
    state.db.upsert_profile(&user.user_id, &profile).await?;
    Ok(Json(profile.dashboard))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveTabRequest {
    source_group_id: Option<String>,
    target_group_id: Option<String>,
}

/// Move a tab between ungrouped and a group, or between two groups.
async fn move_tab(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(tab_id): Path<String>,
    Json(payload): Json<MoveTabRequest>,
) -> Result<Json<DashboardState>> {
    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    profile
        .dashboard
        .move_tab(
            &tab_id,
            payload.source_group_id.as_deref(),
            payload.target_group_id.as_deref(),
        )
        .map_err(state_error)?;
    state.db.upsert_profile(&user.user_id, &profile).await?;
    Ok(Json(profile.dashboard))
}

// ─── Groups ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct GroupNameRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
}

/// Create an empty custom group.
async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<GroupNameRequest>,
) -> Result<Json<TabGroup>> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    let group = profile.dashboard.create_custom_group(&payload.name);
    state.db.upsert_profile(&user.user_id, &profile).await?;

    tracing::info!(user_id = %user.user_id, group_id = %group.id, "Custom group created");
    Ok(Json(group))
}

/// Remove a group; its tabs return to the ungrouped set.
async fn remove_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
) -> Result<Json<DashboardState>> {
    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    profile
        .dashboard
        .remove_group(&group_id)
        .map_err(state_error)?;
    state.db.upsert_profile(&user.user_id, &profile).await?;
    Ok(Json(profile.dashboard))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAiGroupsResponse {
    pub removed: usize,
    pub dashboard: DashboardState,
}

/// Delete every AI-created group. Custom groups are untouched.
async fn delete_ai_groups(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAiGroupsResponse>> {
    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    let removed = profile.dashboard.delete_ai_groups();
    state.db.upsert_profile(&user.user_id, &profile).await?;

    tracing::info!(user_id = %user.user_id, removed, "AI groups deleted");
    Ok(Json(DeleteAiGroupsResponse {
        removed,
        dashboard: profile.dashboard,
    }))
}

/// Rename a group. This always claims it as custom.
async fn rename_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
    Json(payload): Json<GroupNameRequest>,
) -> Result<Json<DashboardState>> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    profile
        .dashboard
        .rename_group(&group_id, &payload.name)
        .map_err(state_error)?;
    state.db.upsert_profile(&user.user_id, &profile).await?;
    Ok(Json(profile.dashboard))
}

/// Remove one tab from one group's membership.
async fn remove_tab_from_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((group_id, tab_id)): Path<(String, String)>,
) -> Result<Json<DashboardState>> {
    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    profile
        .dashboard
        .remove_tab_from_group(&group_id, &tab_id)
        .map_err(state_error)?;
    state.db.upsert_profile(&user.user_id, &profile).await?;
    Ok(Json(profile.dashboard))
}

/// Download a group as a JSON artifact.
async fn export_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
) -> Result<Response> {
    let profile = state.db.get_or_create_profile(&user.user_id).await?;
    let group = profile
        .dashboard
        .groups
        .iter()
        .find(|g| g.id == group_id)
        .ok_or_else(|| crate::error::AppError::NotFound(format!("Group {}", group_id)))?;

    let body = serde_json::to_string_pretty(&group.export())
        .map_err(|e| crate::error::AppError::Internal(anyhow::anyhow!(e)))?;
    let disposition = format!("attachment; filename=\"{}\"", group.export_file_name());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

// ─── Account ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Delete the user's profile document and everything in it.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");
    state.db.delete_profile(&user.user_id).await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: "Account data deleted.".to_string(),
    }))
}

/// Reset the user's profile to the default document (tabs, groups, and
/// settings all cleared).
async fn reset_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    tracing::info!(user_id = %user.user_id, "User-initiated data reset");
    let profile = state.db.reset_profile(&user.user_id).await?;
    Ok(Json(profile))
}
