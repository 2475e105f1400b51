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

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use fluxion_stats_types::ErrorResponse;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const INVALID_DATE_MESSAGE: &str = "Invalid date";

/// Failures of the reporting read paths.
///
/// A valid request that matches no rows is not an error; it yields an empty collection.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("data access failed: {0}")]
    DataAccess(#[from] rusqlite::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => INVALID_DATE_MESSAGE,
            Self::DataAccess(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Log at the level matching the failure class.
    pub fn log(&self, context: &str) {
        match self {
            Self::Validation(reason) => warn!(%reason, context, "Rejected request"),
            Self::DataAccess(e) => error!(error = %e, context, "Datastore query failed"),
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.public_message().to_owned(),
            }),
        )
            .into_response()
    }
}
