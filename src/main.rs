// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tabwise API Server
//!
//! Stores users' tracked tabs and tab groups, and applies AI-suggested
//! grouping and closure suggestions to them.

use std::sync::Arc;
use tabwise::{
    config::Config, db::FirestoreDb, services::GeminiSuggestionService, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Tabwise API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize the Gemini suggestion backend
    let suggestions = Arc::new(GeminiSuggestionService::new(
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));
    tracing::info!(model = %config.gemini_model, "Suggestion backend initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        suggestions,
        suggestions_in_flight: dashmap::DashMap::new(),
    });

    // Build router
    let app = tabwise::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tabwise=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
