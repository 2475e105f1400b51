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

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::record::{DailyAggregate, DailySummary, HourlyRecord};

/// Longest run of consecutive prices strictly below zero.
///
/// Prices must already be in ascending start time order. A price of exactly
/// zero breaks the run.
pub fn longest_negative_streak<I>(prices: I) -> u32
where
    I: IntoIterator<Item = f64>,
{
    let mut longest = 0;
    let mut current = 0;
    for price in prices {
        current = if price < 0.0 { current + 1 } else { 0 };
        longest = longest.max(current);
    }
    longest
}

/// Arithmetic mean, `None` for an empty input.
#[expect(
    clippy::cast_precision_loss,
    reason = "hour counts never exceed mantissa precision"
)]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Summarise exactly the given hours of one date.
///
/// An empty slice yields zero sums, a zero average and no streak.
pub fn summarize_day(date: NaiveDate, hours: &[HourlyRecord]) -> DailySummary {
    DailySummary {
        date,
        total_production: hours.iter().map(|h| h.production_amount).sum(),
        total_consumption: hours.iter().map(|h| h.consumption_amount).sum(),
        avg_price: mean(hours.iter().map(|h| h.hourly_price)).unwrap_or(0.0),
        longest_negative_hours: longest_negative_streak(hours.iter().map(|h| h.hourly_price)),
    }
}

/// Join datastore aggregates with the time-ordered price series of each date.
///
/// `price_series` rows must be ordered by date, then start time. Dates with an
/// aggregate but no prices get a zero streak; prices for dates without an
/// aggregate are ignored. The result is ordered by date ascending.
pub fn summarize(
    aggregates: Vec<DailyAggregate>,
    price_series: Vec<(NaiveDate, f64)>,
) -> Vec<DailySummary> {
    let mut prices_by_date: HashMap<NaiveDate, Vec<f64>> = group_by_date(price_series)
        .into_iter()
        .collect();

    let mut summaries: Vec<DailySummary> = aggregates
        .into_iter()
        .map(|agg| {
            let prices = prices_by_date.remove(&agg.date).unwrap_or_default();
            DailySummary {
                date: agg.date,
                total_production: agg.total_production,
                total_consumption: agg.total_consumption,
                avg_price: agg.avg_price.unwrap_or(0.0),
                longest_negative_hours: longest_negative_streak(prices),
            }
        })
        .collect();

    summaries.sort_by_key(|s| s.date);
    summaries
}

/// Group `(date, item)` pairs by date.
///
/// Groups appear in first-seen date order and keep the input order of their items.
pub fn group_by_date<T, I>(items: I) -> Vec<(NaiveDate, Vec<T>)>
where
    I: IntoIterator<Item = (NaiveDate, T)>,
{
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut groups: Vec<(NaiveDate, Vec<T>)> = Vec::new();
    for (date, item) in items {
        let slot = *index.entry(date).or_insert_with(|| {
            groups.push((date, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(item);
    }
    groups
}

/// The hour with the lowest price; ties keep the earliest hour.
pub fn lowest_price_hour(hours: &[HourlyRecord]) -> Option<&HourlyRecord> {
    hours.iter().fold(None, |lowest, hour| match lowest {
        Some(min) if hour.hourly_price >= min.hourly_price => Some(min),
        _ => Some(hour),
    })
}
