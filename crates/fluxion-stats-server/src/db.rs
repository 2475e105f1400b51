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

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use rusqlite::{OptionalExtension, params};
use std::path::Path;

use fluxion_stats_types::{DailyAggregate, HourlyRecord};

use crate::error::ReportResult;
use crate::report::{DateRange, DayBounds};

/// Fixed-width form both sides of a day-bound comparison are normalised to.
/// Matches SQLite `strftime('%Y-%m-%d %H:%M:%f', ...)`.
const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug)]
pub struct Database {
    conn: Mutex<rusqlite::Connection>,
}

impl Database {
    /// Open the datastore, bootstrapping the table and index when they are missing.
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open database: {path}"))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS electricitydata (
                id                 INTEGER PRIMARY KEY,
                date               TEXT,
                starttime          TEXT NOT NULL,
                productionamount   REAL,
                consumptionamount  REAL,
                hourlyprice        REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_electricitydata_date_starttime
                ON electricitydata(date, starttime);",
        )
        .context("Failed to initialize database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Per-date sums and average price, ordered by date.
    pub fn daily_aggregates(&self, range: &DateRange) -> ReportResult<Vec<DailyAggregate>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT date, SUM(productionamount), SUM(consumptionamount), AVG(hourlyprice), COUNT(*)
             FROM electricitydata
             WHERE date IS NOT NULL
               AND (?1 IS NULL OR date >= ?1)
               AND (?2 IS NULL OR date <= ?2)
             GROUP BY date
             ORDER BY date ASC",
        )?;

        let rows = stmt
            .query_map(params![range.from, range.to], |row| {
                Ok(DailyAggregate {
                    date: row.get(0)?,
                    total_production: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                    total_consumption: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                    avg_price: row.get(3)?,
                    hours: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// `(date, price)` for every row, ordered by date then start time.
    pub fn daily_price_series(&self, range: &DateRange) -> ReportResult<Vec<(NaiveDate, f64)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT date, hourlyprice
             FROM electricitydata
             WHERE date IS NOT NULL
               AND (?1 IS NULL OR date >= ?1)
               AND (?2 IS NULL OR date <= ?2)
             ORDER BY date ASC, strftime('%Y-%m-%d %H:%M:%f', starttime) ASC",
        )?;

        let rows = stmt
            .query_map(params![range.from, range.to], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Rows whose `date` key falls inside `bounds` (inclusive), oldest start time first.
    ///
    /// This is the same row set `daily_aggregates` groups under that date.
    pub fn hourly_records(&self, bounds: &DayBounds) -> ReportResult<Vec<HourlyRecord>> {
        let start = bounds.start.format(SQL_TIMESTAMP_FORMAT).to_string();
        let end = bounds.end.format(SQL_TIMESTAMP_FORMAT).to_string();

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT strftime('%Y-%m-%d %H:%M:%f', starttime), hourlyprice, productionamount, consumptionamount
             FROM electricitydata
             WHERE date IS NOT NULL
               AND strftime('%Y-%m-%d %H:%M:%f', date) BETWEEN ?1 AND ?2
             ORDER BY strftime('%Y-%m-%d %H:%M:%f', starttime) ASC",
        )?;

        let rows = stmt
            .query_map(params![start, end], |row| {
                Ok(HourlyRecord::from_columns(
                    row.get::<_, NaiveDateTime>(0)?.and_utc(),
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn record_count(&self) -> ReportResult<u64> {
        let conn = self.conn.lock();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM electricitydata", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// Earliest and latest date present, `None` for an empty table.
    pub fn date_span(&self) -> ReportResult<Option<(NaiveDate, NaiveDate)>> {
        let conn = self.conn.lock();
        let span = conn
            .query_row(
                "SELECT MIN(date), MAX(date) FROM electricitydata WHERE date IS NOT NULL",
                [],
                |row| {
                    Ok(row
                        .get::<_, Option<NaiveDate>>(0)?
                        .zip(row.get::<_, Option<NaiveDate>>(1)?))
                },
            )
            .optional()?
            .flatten();
        Ok(span)
    }
}
