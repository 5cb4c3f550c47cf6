// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod gemini;
pub mod reconcile;
pub mod suggest;

pub use gemini::GeminiSuggestionService;
pub use reconcile::{reconcile, Proposal, ReconcileOutcome, ReconcileSummary};
pub use suggest::SuggestionBackend;
