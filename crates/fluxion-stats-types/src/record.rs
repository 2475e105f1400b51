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

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One hour of market data: price plus metered production and consumption.
///
/// Missing production/consumption readings are stored as `0.0` by the time a
/// record is built, so consumers never see a null measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(rename = "starttime", with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "hourlyprice")]
    pub hourly_price: f64,
    #[serde(rename = "productionamount")]
    pub production_amount: f64,
    #[serde(rename = "consumptionamount")]
    pub consumption_amount: f64,
}

impl HourlyRecord {
    /// Build a record from raw column values, treating a missing measurement as zero.
    pub fn from_columns(
        start_time: DateTime<Utc>,
        hourly_price: f64,
        production_amount: Option<f64>,
        consumption_amount: Option<f64>,
    ) -> Self {
        Self {
            start_time,
            hourly_price,
            production_amount: production_amount.unwrap_or(0.0),
            consumption_amount: consumption_amount.unwrap_or(0.0),
        }
    }
}

/// Per-date statistics derived from all hourly records of that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_production: f64,
    pub total_consumption: f64,
    pub avg_price: f64,
    pub longest_negative_hours: u32,
}

/// Group-by-date result as returned by the datastore, before the streak is known.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total_production: f64,
    pub total_consumption: f64,
    /// `None` when the date has no rows to average over.
    pub avg_price: Option<f64>,
    pub hours: u32,
}

/// Body of `GET /electricitydata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResponse {
    pub data: Vec<DailySummary>,
    pub total_records: usize,
}

impl DailyResponse {
    pub fn new(data: Vec<DailySummary>) -> Self {
        Self {
            total_records: data.len(),
            data,
        }
    }
}

/// Body of `GET /electricitydata/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyResponse {
    pub data: Vec<HourlyRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub total: u64,
}

/// Error envelope; the message is fixed per failure class and never carries internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// RFC 3339 in UTC with millisecond precision and a `Z` suffix, e.g. `2024-01-15T13:00:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
