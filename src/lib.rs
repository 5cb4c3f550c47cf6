// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tabwise: backend API for the tab management dashboard.
//!
//! This crate stores per-user tab/group/settings documents, applies
//! manual mutations over them, and merges AI-suggested tab groups into
//! the current state via the reconciliation service.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use dashmap::DashMap;
use db::FirestoreDb;
use services::SuggestionBackend;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub suggestions: Arc<dyn SuggestionBackend>,
    /// Users with a suggestion pass outstanding; a second pass for the
    /// same user is rejected rather than interleaved.
    pub suggestions_in_flight: DashMap<String, ()>,
}
