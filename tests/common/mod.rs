// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tabwise::config::Config;
use tabwise::db::FirestoreDb;
use tabwise::error::AppError;
use tabwise::models::{DashboardState, Tab, TabGroup};
use tabwise::routes::create_router;
use tabwise::services::suggest::{
    GroupSuggestionRequest, InactiveSuggestionRequest, InactiveSuggestions, KeyValidation,
    SuggestionBackend,
};
use tabwise::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Suggestion backend stub with canned responses and a call counter.
#[allow(dead_code)]
pub struct MockSuggestionBackend {
    pub group_calls: AtomicUsize,
    pub group_response: Mutex<Vec<Value>>,
    pub inactive_response: Mutex<Option<InactiveSuggestions>>,
}

#[allow(dead_code)]
impl MockSuggestionBackend {
    pub fn new() -> Self {
        Self {
            group_calls: AtomicUsize::new(0),
            group_response: Mutex::new(Vec::new()),
            inactive_response: Mutex::new(None),
        }
    }

    pub fn with_group_response(proposals: Vec<Value>) -> Self {
        let backend = Self::new();
        *backend.group_response.lock().unwrap() = proposals;
        backend
    }

    pub fn group_call_count(&self) -> usize {
        self.group_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionBackend for MockSuggestionBackend {
    async fn suggest_groups(
        &self,
        _api_key: &str,
        _request: &GroupSuggestionRequest,
    ) -> Result<Vec<Value>, AppError> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.group_response.lock().unwrap().clone())
    }

    async fn suggest_inactive(
        &self,
        _api_key: &str,
        _request: &InactiveSuggestionRequest,
    ) -> Result<InactiveSuggestions, AppError> {
        self.inactive_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::SuggestionApi("no canned response".to_string()))
    }

    async fn validate_api_key(&self, api_key: &str) -> Result<KeyValidation, AppError> {
        Ok(KeyValidation {
            is_valid: api_key == "valid-key",
            error: (api_key != "valid-key").then(|| "Invalid API Key or API error.".to_string()),
        })
    }
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_mock();
    let suggestions = Arc::new(MockSuggestionBackend::new());

    let state = Arc::new(AppState {
        config,
        db,
        suggestions,
        suggestions_in_flight: dashmap::DashMap::new(),
    });

    (create_router(state.clone()), state)
}

/// A tab with the given id/url; title mirrors the id.
#[allow(dead_code)]
pub fn tab(id: &str, url: &str) -> Tab {
    Tab {
        id: id.to_string(),
        title: id.to_string(),
        url: url.to_string(),
        favicon_url: None,
        last_accessed: Some(1_000),
        is_placeholder: None,
    }
}

/// A group holding the given tabs.
#[allow(dead_code)]
pub fn group(id: &str, name: &str, tabs: Vec<Tab>, is_custom: bool) -> TabGroup {
    TabGroup {
        id: id.to_string(),
        name: name.to_string(),
        tabs,
        color: None,
        is_custom,
    }
}

/// Dashboard state from parts.
#[allow(dead_code)]
pub fn state_of(tabs: Vec<Tab>, groups: Vec<TabGroup>) -> DashboardState {
    DashboardState { tabs, groups }
}
