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

//! Keyword filtering, sorting and paging of the daily summaries table.
//!
//! The table state lives entirely in the request query string; nothing here
//! is stored between requests.

use std::cmp::Ordering;

use serde::Deserialize;

use fluxion_stats_types::DailySummary;

use crate::config::ROWS_PER_PAGE_OPTIONS;
use crate::format::format_amount;

/// Raw table state from the query string. Unknown or malformed values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub rows: Option<String>,
    pub f_date: Option<String>,
    pub f_production: Option<String>,
    pub f_consumption: Option<String>,
    pub f_price: Option<String>,
    pub f_streak: Option<String>,
}

impl GridQuery {
    fn column_filter(&self, field: SortField) -> &str {
        let raw = match field {
            SortField::Date => &self.f_date,
            SortField::TotalProduction => &self.f_production,
            SortField::TotalConsumption => &self.f_consumption,
            SortField::AvgPrice => &self.f_price,
            SortField::LongestNegativeHours => &self.f_streak,
        };
        raw.as_deref().unwrap_or_default().trim()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    TotalProduction,
    TotalConsumption,
    AvgPrice,
    LongestNegativeHours,
}

impl SortField {
    pub const ALL: [Self; 5] = [
        Self::Date,
        Self::TotalProduction,
        Self::TotalConsumption,
        Self::AvgPrice,
        Self::LongestNegativeHours,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::TotalProduction => "totalProduction",
            Self::TotalConsumption => "totalConsumption",
            Self::AvgPrice => "avgPrice",
            Self::LongestNegativeHours => "longestNegativeHours",
        }
    }

    /// Query parameter of the column's filter input.
    pub fn filter_key(self) -> &'static str {
        match self {
            Self::Date => "f_date",
            Self::TotalProduction => "f_production",
            Self::TotalConsumption => "f_consumption",
            Self::AvgPrice => "f_price",
            Self::LongestNegativeHours => "f_streak",
        }
    }

    /// The cell as displayed in the table; column filters match against this.
    fn cell_text(self, summary: &DailySummary) -> String {
        match self {
            Self::Date => summary.date.to_string(),
            Self::TotalProduction => format_amount(summary.total_production),
            Self::TotalConsumption => format_amount(summary.total_consumption),
            Self::AvgPrice => format_amount(summary.avg_price),
            Self::LongestNegativeHours => summary.longest_negative_hours.to_string(),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == raw)
    }

    fn compare(self, a: &DailySummary, b: &DailySummary) -> Ordering {
        match self {
            Self::Date => a.date.cmp(&b.date),
            Self::TotalProduction => a.total_production.total_cmp(&b.total_production),
            Self::TotalConsumption => a.total_consumption.total_cmp(&b.total_consumption),
            Self::AvgPrice => a.avg_price.total_cmp(&b.avg_price),
            Self::LongestNegativeHours => a.longest_negative_hours.cmp(&b.longest_negative_hours),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn key(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Case-insensitive "contains" filter on one column. An empty value matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub field: SortField,
    pub value: String,
}

impl ColumnFilter {
    fn matches(&self, summary: &DailySummary) -> bool {
        self.value.is_empty()
            || self
                .field
                .cell_text(summary)
                .to_lowercase()
                .contains(&self.value.to_lowercase())
    }
}

/// One rendered page of the table plus the resolved state used to build links.
#[derive(Debug, Clone)]
pub struct GridPage {
    pub rows: Vec<DailySummary>,
    pub keyword: String,
    /// One entry per column, in `SortField::ALL` order.
    pub filters: Vec<ColumnFilter>,
    pub sort: SortField,
    pub order: SortOrder,
    /// 1-based, clamped to `1..=page_count`.
    pub page: usize,
    pub page_count: usize,
    pub rows_per_page: usize,
    pub matched: usize,
    pub total: usize,
}

/// Filter (keyword AND every column filter), sort and paginate.
pub fn apply(summaries: Vec<DailySummary>, query: &GridQuery, default_rows: usize) -> GridPage {
    let total = summaries.len();
    let keyword = query.q.as_deref().unwrap_or_default().trim().to_owned();
    let filters: Vec<ColumnFilter> = SortField::ALL
        .into_iter()
        .map(|field| ColumnFilter {
            field,
            value: query.column_filter(field).to_owned(),
        })
        .collect();
    let sort = query
        .sort
        .as_deref()
        .and_then(SortField::parse)
        .unwrap_or(SortField::Date);
    let order = match query.order.as_deref() {
        Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        _ if sort == SortField::Date => SortOrder::Desc,
        _ => SortOrder::Asc,
    };
    let rows_per_page = query
        .rows
        .as_deref()
        .and_then(|r| r.parse::<usize>().ok())
        .filter(|r| ROWS_PER_PAGE_OPTIONS.contains(r))
        .unwrap_or(default_rows)
        .max(1);

    let mut matching: Vec<DailySummary> = summaries
        .into_iter()
        .filter(|s| matches_keyword(s, &keyword) && filters.iter().all(|f| f.matches(s)))
        .collect();
    matching.sort_by(|a, b| match order {
        SortOrder::Asc => sort.compare(a, b),
        SortOrder::Desc => sort.compare(b, a),
    });

    let matched = matching.len();
    let page_count = matched.div_ceil(rows_per_page).max(1);
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, page_count);

    let rows = matching
        .into_iter()
        .skip((page - 1) * rows_per_page)
        .take(rows_per_page)
        .collect();

    GridPage {
        rows,
        keyword,
        filters,
        sort,
        order,
        page,
        page_count,
        rows_per_page,
        matched,
        total,
    }
}

/// Case-insensitive substring match against the date, raw and formatted numbers and the streak.
fn matches_keyword(summary: &DailySummary, keyword: &str) -> bool {
    if keyword.is_empty() {
        return true;
    }
    let needle = keyword.to_lowercase();
    let haystacks = [
        summary.date.to_string(),
        summary.total_production.to_string(),
        format_amount(summary.total_production),
        summary.total_consumption.to_string(),
        format_amount(summary.total_consumption),
        summary.avg_price.to_string(),
        format_amount(summary.avg_price),
        summary.longest_negative_hours.to_string(),
    ];
    haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
}

impl GridPage {
    fn href(&self, sort: SortField, order: SortOrder, page: usize, rows: usize) -> String {
        let mut href = format!(
            "?sort={}&order={}&page={page}&rows={rows}",
            sort.key(),
            order.key()
        );
        if !self.keyword.is_empty() {
            href.push_str("&q=");
            href.push_str(&urlencoding::encode(&self.keyword));
        }
        for filter in self.filters.iter().filter(|f| !f.value.is_empty()) {
            href.push('&');
            href.push_str(filter.field.filter_key());
            href.push('=');
            href.push_str(&urlencoding::encode(&filter.value));
        }
        href
    }

    /// Link sorting by `field`; clicking the active column flips the order.
    pub fn sort_href(&self, field: SortField) -> String {
        let order = if field == self.sort {
            self.order.reversed()
        } else {
            SortOrder::Asc
        };
        self.href(field, order, 1, self.rows_per_page)
    }

    pub fn page_href(&self, page: usize) -> String {
        self.href(self.sort, self.order, page, self.rows_per_page)
    }

    pub fn rows_href(&self, rows: usize) -> String {
        self.href(self.sort, self.order, 1, rows)
    }

    /// Arrow shown next to the active column header.
    pub fn sort_indicator(&self, field: SortField) -> &'static str {
        match (field == self.sort, self.order) {
            (false, _) => "",
            (true, SortOrder::Asc) => "▲",
            (true, SortOrder::Desc) => "▼",
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}
