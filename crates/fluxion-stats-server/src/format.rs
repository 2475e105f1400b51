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

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format with a thousands separator and between `min_decimals` and
/// `max_decimals` fraction digits, e.g. `1234.5` -> `1,234.50` for (2, 2).
pub fn format_number(value: f64, min_decimals: usize, max_decimals: usize) -> String {
    let max_decimals = max_decimals.max(min_decimals);
    let fixed = format!("{:.*}", max_decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_owned();
    while frac.len() > min_decimals && frac.ends_with('0') {
        frac.pop();
    }

    let mut grouped = String::with_capacity(int_part.len() * 2);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Table and filter form of an amount or price: two fixed decimals.
pub fn format_amount(value: f64) -> String {
    format_number(value, 2, 2)
}

/// `HH:MM` of a UTC instant in the display timezone.
pub fn format_clock(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%H:%M").to_string()
}

/// Chart axis label: `HH:00` in the display timezone.
pub fn format_hour_label(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%H:00").to_string()
}
