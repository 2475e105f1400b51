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

//! Read paths shared by the JSON API and the dashboard.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use fluxion_stats_types::{DailySummary, HourlyRecord, summarize};

use crate::db::Database;
use crate::error::{ReportError, ReportResult};

/// Parse a strict ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> ReportResult<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 10 {
        return Err(ReportError::Validation(format!("not a YYYY-MM-DD date: {raw}")));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ReportError::Validation(format!("not a YYYY-MM-DD date: {raw} ({e})")))
}

/// Inclusive UTC bounds of one calendar day: `00:00:00.000` to `23:59:59.999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayBounds {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1) - Duration::milliseconds(1),
        }
    }
}

/// Optional inclusive date filter for the daily report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Build from raw query values; blank values mean "unbounded".
    pub fn parse(from: Option<&str>, to: Option<&str>) -> ReportResult<Self> {
        let parse_opt = |raw: Option<&str>| {
            raw.filter(|s| !s.trim().is_empty())
                .map(parse_date)
                .transpose()
        };
        let range = Self {
            from: parse_opt(from)?,
            to: parse_opt(to)?,
        };
        if let (Some(from), Some(to)) = (range.from, range.to)
            && from > to
        {
            return Err(ReportError::Validation(format!(
                "range start {from} is after range end {to}"
            )));
        }
        Ok(range)
    }
}

/// One summary per date present in the datastore, ordered by date.
pub fn daily_report(db: &Database, range: &DateRange) -> ReportResult<Vec<DailySummary>> {
    let aggregates = db.daily_aggregates(range)?;
    if aggregates.is_empty() {
        return Ok(Vec::new());
    }
    let hours: u64 = aggregates.iter().map(|a| u64::from(a.hours)).sum();
    let series = db.daily_price_series(range)?;
    let summaries = summarize(aggregates, series);
    debug!(days = summaries.len(), hours, "Daily report built");
    Ok(summaries)
}

/// Hourly records of one date, oldest first. An unknown date yields an empty list.
pub fn hourly_report(db: &Database, date: NaiveDate) -> ReportResult<Vec<HourlyRecord>> {
    let records = db.hourly_records(&DayBounds::for_date(date))?;
    debug!(%date, hours = records.len(), "Hourly report built");
    Ok(records)
}
