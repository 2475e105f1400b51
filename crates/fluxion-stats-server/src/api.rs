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

//! JSON read endpoints.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use serde::Deserialize;

use fluxion_stats_types::{DailyResponse, HealthResponse, HourlyResponse};

use crate::AppState;
use crate::error::ReportResult;
use crate::report::{DateRange, daily_report, hourly_report, parse_date};

/// Optional inclusive date filter of `GET /electricitydata`.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/electricitydata", get(daily_handler))
        .route("/electricitydata/{date}", get(hourly_handler))
        .route("/health", get(health_handler))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn daily_handler(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ReportResult<Json<DailyResponse>> {
    let range = DateRange::parse(query.from.as_deref(), query.to.as_deref())
        .inspect_err(|e| e.log("daily report"))?;
    let data = daily_report(&state.db, &range).inspect_err(|e| e.log("daily report"))?;
    Ok(Json(DailyResponse::new(data)))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn hourly_handler(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
) -> ReportResult<Json<HourlyResponse>> {
    let date = parse_date(&raw_date).inspect_err(|e| e.log("hourly report"))?;
    let data = hourly_report(&state.db, date).inspect_err(|e| e.log("hourly report"))?;
    Ok(Json(HourlyResponse { data }))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn health_handler(State(state): State<AppState>) -> ReportResult<Json<HealthResponse>> {
    let total = state
        .db
        .record_count()
        .inspect_err(|e| e.log("health"))?;
    Ok(Json(HealthResponse {
        status: "ok".to_owned(),
        total,
    }))
}
