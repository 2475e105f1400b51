// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Read-only statistics server over the hourly electricity table.
//!
//! Serves the daily/hourly JSON API (also under `/api`) and a server-rendered
//! dashboard with a per-day detail page.

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod format;
pub mod grid;
pub mod report;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::DashboardSettings;
use crate::db::Database;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub dashboard: Arc<DashboardSettings>,
}

/// Assemble every route with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .route("/day/{date}", get(dashboard::day_handler))
        .merge(api::routes())
        .nest("/api", api::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
