// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations on user profiles.
//!
//! The whole profile (tabs, groups, settings) is a single document keyed
//! by user id; reads and writes replace the document wholesale, so the
//! consistency model is last-write-wins per user. Every call goes through
//! the retry policy; permission and authentication failures abort
//! immediately.

use crate::db::collections;
use crate::db::retry::RetryPolicy;
use crate::error::AppError;
use crate::models::UserProfile;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    retry: RetryPolicy,
}

/// Whether a Firestore failure is worth retrying. Mirrors the write-path
/// policy of the web client: permission-denied and unauthenticated are
/// terminal.
fn is_retryable(err: &firestore::errors::FirestoreError) -> bool {
    let msg = err.to_string().to_ascii_lowercase();
    !(msg.contains("permission") || msg.contains("unauthenticated"))
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user's profile document, if it exists.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        let client = self.get_client()?;
        self.retry
            .execute(
                || async move {
                    client
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_PROFILES)
                        .obj()
                        .one(user_id)
                        .await
                },
                is_retryable,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's profile, creating and persisting the default document
    /// when none exists yet.
    pub async fn get_or_create_profile(&self, user_id: &str) -> Result<UserProfile, AppError> {
        if let Some(profile) = self.get_profile(user_id).await? {
            return Ok(profile);
        }

        let profile = UserProfile::default();
        self.upsert_profile(user_id, &profile).await?;
        tracing::info!(user_id, "Created default user profile");
        Ok(profile)
    }

    /// Create or replace a user's profile document.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;
        let _: () = self
            .retry
            .execute(
                || async move {
                    client
                        .fluent()
                        .update()
                        .in_col(collections::USER_PROFILES)
                        .document_id(user_id)
                        .object(profile)
                        .execute()
                        .await
                },
                is_retryable,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Reset a user's profile to the default document and return it.
    pub async fn reset_profile(&self, user_id: &str) -> Result<UserProfile, AppError> {
        let profile = UserProfile::default();
        self.upsert_profile(user_id, &profile).await?;
        tracing::info!(user_id, "User profile reset");
        Ok(profile)
    }

    /// Delete a user's profile document entirely.
    pub async fn delete_profile(&self, user_id: &str) -> Result<(), AppError> {
        let client = self.get_client()?;
        self.retry
            .execute(
                || async move {
                    client
                        .fluent()
                        .delete()
                        .from(collections::USER_PROFILES)
                        .document_id(user_id)
                        .execute()
                        .await
                },
                is_retryable,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::info!(user_id, "User profile deleted");
        Ok(())
    }
}
