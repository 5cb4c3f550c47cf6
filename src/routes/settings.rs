// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Settings routes: the per-user configuration surface and API-key
//! validation.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserSettings;
use crate::services::suggest::KeyValidation;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Settings routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/settings", get(get_settings).put(update_settings))
        .route("/api/settings/validate-key", post(validate_key))
}

/// Get the user's settings.
async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserSettings>> {
    let profile = state.db.get_or_create_profile(&user.user_id).await?;
    Ok(Json(profile.settings))
}

/// Replace the user's settings (the settings field is written whole).
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>> {
    let mut profile = state.db.get_or_create_profile(&user.user_id).await?;
    profile.settings = settings;
    state.db.upsert_profile(&user.user_id, &profile).await?;

    tracing::info!(user_id = %user.user_id, "Settings updated");
    Ok(Json(profile.settings))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ValidateKeyRequest {
    #[validate(length(min = 1, message = "apiKey must not be empty"))]
    api_key: String,
}

/// Check whether a Gemini API key works, without storing it.
async fn validate_key(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ValidateKeyRequest>,
) -> Result<Json<KeyValidation>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let validation = state.suggestions.validate_api_key(&payload.api_key).await?;
    tracing::debug!(user_id = %user.user_id, is_valid = validation.is_valid, "API key validated");
    Ok(Json(validation))
}
