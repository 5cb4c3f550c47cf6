// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod profile;
pub mod settings;
pub mod state;
pub mod tab;

pub use profile::UserProfile;
pub use settings::UserSettings;
pub use state::{DashboardState, ImportOutcome, StateError};
pub use tab::{GroupExport, Tab, TabGroup};
