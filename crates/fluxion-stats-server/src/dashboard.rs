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

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{error, warn};

use fluxion_stats_types::{DailySummary, HourlyRecord, lowest_price_hour, summarize_day};

use crate::AppState;
use crate::chart::generate_hourly_chart_svg;
use crate::config::{DashboardSettings, ROWS_PER_PAGE_OPTIONS};
use crate::error::{INTERNAL_ERROR_MESSAGE, INVALID_DATE_MESSAGE, ReportError};
use crate::format::{format_amount, format_clock, format_number};
use crate::grid::{self, GridPage, GridQuery, SortField};
use crate::report::{DateRange, daily_report, hourly_report, parse_date};

const MISSING: &str = "-";

#[derive(Debug, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub headers: Vec<HeaderCell>,
    pub filters: Vec<FilterCell>,
    pub rows: Vec<SummaryRow>,
    pub keyword: String,
    pub sort: &'static str,
    pub order: &'static str,
    pub rows_per_page: usize,
    pub rows_options: Vec<RowsOption>,
    pub page: usize,
    pub page_count: usize,
    pub matched: usize,
    pub total: usize,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub data_span: String,
    pub server_time: String,
}

#[derive(Debug)]
pub struct HeaderCell {
    pub label: &'static str,
    pub href: String,
    pub indicator: &'static str,
}

/// Per-column filter input; `name` is the query parameter.
#[derive(Debug)]
pub struct FilterCell {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug)]
pub struct RowsOption {
    pub value: usize,
    pub href: String,
    pub selected: bool,
}

#[derive(Debug)]
pub struct SummaryRow {
    pub date: String,
    pub href: String,
    pub total_production: String,
    pub total_consumption: String,
    pub avg_price: String,
    pub longest_negative_hours: u32,
}

#[derive(Debug, Template)]
#[template(path = "day.html")]
pub struct DayTemplate {
    pub date: String,
    pub total_production: String,
    pub total_consumption: String,
    pub avg_price: String,
    pub longest_negative_hours: u32,
    pub lowest: LowestPriceDisplay,
    pub hours: Vec<HourRow>,
    pub chart_svg: String,
    pub timezone: String,
}

/// The "lowest price" block. Every field is `-` for a day without hours.
#[derive(Debug)]
pub struct LowestPriceDisplay {
    pub price: String,
    pub time: String,
    pub production: String,
}

#[derive(Debug)]
pub struct HourRow {
    pub time: String,
    pub production: String,
    pub consumption: String,
    pub price: String,
}

#[derive(Debug, Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: &'static str,
}

fn header_label(field: SortField) -> &'static str {
    match field {
        SortField::Date => "Date",
        SortField::TotalProduction => "Production",
        SortField::TotalConsumption => "Consumption",
        SortField::AvgPrice => "Avg Price (€)",
        SortField::LongestNegativeHours => "Negative streak (h)",
    }
}

fn summary_row(summary: &DailySummary) -> SummaryRow {
    SummaryRow {
        date: summary.date.to_string(),
        href: format!("/day/{}", summary.date),
        total_production: format_amount(summary.total_production),
        total_consumption: format_amount(summary.total_consumption),
        avg_price: format_amount(summary.avg_price),
        longest_negative_hours: summary.longest_negative_hours,
    }
}

fn dashboard_template(grid: &GridPage, data_span: Option<(NaiveDate, NaiveDate)>) -> DashboardTemplate {
    DashboardTemplate {
        headers: SortField::ALL
            .into_iter()
            .map(|field| HeaderCell {
                label: header_label(field),
                href: grid.sort_href(field),
                indicator: grid.sort_indicator(field),
            })
            .collect(),
        filters: grid
            .filters
            .iter()
            .map(|f| FilterCell {
                name: f.field.filter_key(),
                value: f.value.clone(),
            })
            .collect(),
        rows: grid.rows.iter().map(summary_row).collect(),
        keyword: grid.keyword.clone(),
        sort: grid.sort.key(),
        order: grid.order.key(),
        rows_per_page: grid.rows_per_page,
        rows_options: ROWS_PER_PAGE_OPTIONS
            .into_iter()
            .map(|value| RowsOption {
                value,
                href: grid.rows_href(value),
                selected: value == grid.rows_per_page,
            })
            .collect(),
        page: grid.page,
        page_count: grid.page_count,
        matched: grid.matched,
        total: grid.total,
        previous_href: grid
            .has_previous()
            .then(|| grid.page_href(grid.page - 1)),
        next_href: grid.has_next().then(|| grid.page_href(grid.page + 1)),
        data_span: data_span.map_or_else(
            || MISSING.to_owned(),
            |(first, last)| format!("{first} to {last}"),
        ),
        server_time: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

fn lowest_price_display(hours: &[HourlyRecord], tz: Tz) -> LowestPriceDisplay {
    match lowest_price_hour(hours) {
        Some(hour) => LowestPriceDisplay {
            price: format!("{} €", format_number(hour.hourly_price, 2, 3)),
            time: format_clock(hour.start_time, tz),
            production: format_number(hour.production_amount, 2, 3),
        },
        None => LowestPriceDisplay {
            price: MISSING.to_owned(),
            time: MISSING.to_owned(),
            production: MISSING.to_owned(),
        },
    }
}

/// The totals come from the daily report row the table shows for this date.
fn day_template(
    summary: &DailySummary,
    hours: &[HourlyRecord],
    settings: &DashboardSettings,
) -> DayTemplate {
    let tz = settings.tz();

    let chart_svg =
        generate_hourly_chart_svg(hours, settings.chart_width, settings.chart_height, tz)
            .unwrap_or_else(|e| {
                error!(error = %e, date = %summary.date, "Failed to render hourly chart");
                String::new()
            });

    DayTemplate {
        date: summary.date.to_string(),
        total_production: format_amount(summary.total_production),
        total_consumption: format_amount(summary.total_consumption),
        avg_price: format!("{} €", format_amount(summary.avg_price)),
        longest_negative_hours: summary.longest_negative_hours,
        lowest: lowest_price_display(hours, tz),
        hours: hours
            .iter()
            .map(|h| HourRow {
                time: format_clock(h.start_time, tz),
                production: format_number(h.production_amount, 2, 3),
                consumption: format_number(h.consumption_amount, 2, 3),
                price: format!("{} €", format_number(h.hourly_price, 3, 3)),
            })
            .collect(),
        chart_svg,
        timezone: tz.name().to_owned(),
    }
}

fn render_page<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Template render error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<h1>{INTERNAL_ERROR_MESSAGE}</h1>")),
            )
                .into_response()
        }
    }
}

fn error_page(status: StatusCode, message: &'static str) -> Response {
    render_page(
        status,
        &ErrorTemplate {
            status: status.as_u16(),
            message,
        },
    )
}

fn report_error_page(e: &ReportError, context: &str) -> Response {
    e.log(context);
    error_page(e.status(), e.public_message())
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Response {
    let summaries = match daily_report(&state.db, &DateRange::default()) {
        Ok(s) => s,
        Err(e) => return report_error_page(&e, "dashboard"),
    };

    // The span is informational only; the table still renders without it.
    let data_span = state.db.date_span().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read data span for dashboard");
        None
    });

    let grid = grid::apply(summaries, &query, state.dashboard.rows_per_page);
    render_page(StatusCode::OK, &dashboard_template(&grid, data_span))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn day_handler(State(state): State<AppState>, Path(raw_date): Path<String>) -> Response {
    let date = match parse_date(&raw_date) {
        Ok(d) => d,
        Err(e) => {
            e.log("day page");
            return error_page(StatusCode::BAD_REQUEST, INVALID_DATE_MESSAGE);
        }
    };

    let range = DateRange {
        from: Some(date),
        to: Some(date),
    };
    let summary = match daily_report(&state.db, &range) {
        Ok(summaries) => summaries
            .into_iter()
            .next()
            .unwrap_or_else(|| summarize_day(date, &[])),
        Err(e) => return report_error_page(&e, "day page"),
    };

    match hourly_report(&state.db, date) {
        Ok(hours) => render_page(
            StatusCode::OK,
            &day_template(&summary, &hours, &state.dashboard),
        ),
        Err(e) => report_error_page(&e, "day page"),
    }
}
