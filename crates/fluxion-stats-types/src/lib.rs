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

//! Shared types and pure statistics for the electricity statistics dashboard.
//!
//! Everything in this crate is free of I/O so the daily aggregation and the
//! negative price streak logic can be tested without a datastore.

pub mod record;
pub mod stats;

pub use record::{
    DailyAggregate, DailyResponse, DailySummary, ErrorResponse, HealthResponse, HourlyRecord,
    HourlyResponse,
};
pub use stats::{
    group_by_date, longest_negative_streak, lowest_price_hour, mean, summarize, summarize_day,
};
