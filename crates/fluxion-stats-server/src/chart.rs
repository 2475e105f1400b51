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

use chrono_tz::Tz;
use plotters::prelude::*;

use fluxion_stats_types::HourlyRecord;

use crate::format::format_hour_label;

const CONSUMPTION_COLOR: RGBColor = RGBColor(33, 150, 243); // Blue
const PRODUCTION_COLOR: RGBColor = RGBColor(76, 175, 80); // Green
const AXIS_COLOR: RGBColor = RGBColor(120, 120, 120);

/// Generate an SVG line chart of one day's hours.
///
/// Consumption is plotted against the left axis and production against the
/// right axis, with `HH:00` labels in `timezone`. Returns an empty string when
/// there are no hours.
///
/// # Errors
/// Returns error if chart generation fails
pub fn generate_hourly_chart_svg(
    hours: &[HourlyRecord],
    width: u32,
    height: u32,
    timezone: Tz,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut svg_data = String::new();

    if hours.is_empty() {
        return Ok(svg_data);
    }

    let labels: Vec<String> = hours
        .iter()
        .map(|h| format_hour_label(h.start_time, timezone))
        .collect();
    let last_x = i32::try_from(hours.len() - 1).unwrap_or(i32::MAX).max(1);

    let consumption_max = axis_max(hours.iter().map(|h| h.consumption_amount));
    let production_max = axis_max(hours.iter().map(|h| h.production_amount));

    {
        let root = SVGBackend::with_string(&mut svg_data, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Hourly consumption and production",
                ("sans-serif", 18, &BLACK),
            )
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .right_y_label_area_size(60)
            .build_cartesian_2d(0..last_x, 0.0..consumption_max)?
            .set_secondary_coord(0..last_x, 0.0..production_max);

        let label_at = |x: &i32| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels(labels.len().min(12))
            .x_label_formatter(&label_at)
            .y_desc("Consumption")
            .label_style(("sans-serif", 12, &AXIS_COLOR))
            .axis_style(AXIS_COLOR)
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_desc("Production")
            .label_style(("sans-serif", 12, &AXIS_COLOR))
            .axis_style(AXIS_COLOR)
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                (0_i32..).zip(hours.iter().map(|h| h.consumption_amount)),
                CONSUMPTION_COLOR.stroke_width(2),
            ))?
            .label("Consumption")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CONSUMPTION_COLOR));

        chart
            .draw_secondary_series(LineSeries::new(
                (0_i32..).zip(hours.iter().map(|h| h.production_amount)),
                PRODUCTION_COLOR.stroke_width(2),
            ))?
            .label("Production")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PRODUCTION_COLOR));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(AXIS_COLOR)
            .draw()?;

        root.present()?;
    }

    Ok(svg_data)
}

/// Upper bound of a non-negative axis: 10% headroom, never a zero-height range.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}
