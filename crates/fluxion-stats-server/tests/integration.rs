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

#![expect(
    clippy::float_cmp,
    reason = "seeded amounts are small integers and halves, exact in f64"
)]

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;

use fluxion_stats_server::config::DashboardSettings;
use fluxion_stats_server::db::Database;
use fluxion_stats_server::{AppState, build_router};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// One `electricitydata` row: date, starttime, production, consumption, price.
type Row<'a> = (&'a str, &'a str, Option<f64>, Option<f64>, f64);

struct TestServer {
    port: u16,
    db_path: PathBuf,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("data").join("electricity.db");
        let db = Arc::new(
            Database::open(db_path.to_str().expect("Non-UTF-8 temp path"))
                .expect("Failed to open test database"),
        );

        let app = build_router(AppState {
            db,
            dashboard: Arc::new(DashboardSettings::default()),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            port,
            db_path,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    fn connect(&self) -> rusqlite::Connection {
        rusqlite::Connection::open(&self.db_path).expect("Failed to open seed connection")
    }

    fn seed(&self, rows: &[Row<'_>]) {
        let conn = self.connect();
        for (date, start, production, consumption, price) in rows {
            conn.execute(
                "INSERT INTO electricitydata
                    (date, starttime, productionamount, consumptionamount, hourlyprice)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![date, start, production, consumption, price],
            )
            .expect("Failed to seed row");
        }
    }

    fn drop_table(&self) {
        self.connect()
            .execute_batch("DROP TABLE electricitydata;")
            .expect("Failed to drop table");
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = resp.status();
        let body = resp.json().await.expect("Response is not JSON");
        (status, body)
    }

    async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = resp.status();
        let body = resp.text().await.expect("Failed to read body");
        (status, body)
    }
}

/// A day of hourly rows starting at midnight UTC with the given prices.
fn day_rows(date: &str, prices: &[f64]) -> Vec<(String, f64)> {
    prices
        .iter()
        .enumerate()
        .map(|(h, p)| (format!("{date}T{h:02}:00:00.000Z"), *p))
        .collect()
}

fn seed_day(server: &TestServer, date: &str, prices: &[f64], production: f64, consumption: f64) {
    let starts = day_rows(date, prices);
    let rows: Vec<Row<'_>> = starts
        .iter()
        .map(|(start, price)| (date, start.as_str(), Some(production), Some(consumption), *price))
        .collect();
    server.seed(&rows);
}

// ---------------------------------------------------------------------------
// Daily aggregates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_daily_summary_values_and_streak() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[-1.0, -2.0, 0.0, -3.0, -4.0, -5.0, 1.0], 2.0, 3.0);

    let (status, body) = server.get_json("/electricitydata").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRecords"], 1);

    let day = &body["data"][0];
    assert_eq!(day["date"], "2024-01-15");
    assert_eq!(day["totalProduction"], 14.0);
    assert_eq!(day["totalConsumption"], 21.0);
    assert_eq!(day["avgPrice"], -2.0);
    assert_eq!(day["longestNegativeHours"], 3);
}

#[tokio::test]
async fn test_daily_summaries_ordered_by_date() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-17", &[1.0], 1.0, 1.0);
    seed_day(&server, "2024-01-15", &[1.0], 1.0, 1.0);
    seed_day(&server, "2024-01-16", &[1.0], 1.0, 1.0);

    let (_, body) = server.get_json("/electricitydata").await;
    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-15", "2024-01-16", "2024-01-17"]);
}

#[tokio::test]
async fn test_missing_amounts_count_as_zero() {
    let server = TestServer::start().await;
    server.seed(&[
        ("2024-01-15", "2024-01-15T00:00:00.000Z", None, Some(2.0), 1.0),
        ("2024-01-15", "2024-01-15T01:00:00.000Z", Some(3.0), None, 3.0),
    ]);

    let (_, body) = server.get_json("/electricitydata").await;
    let day = &body["data"][0];
    assert_eq!(day["totalProduction"], 3.0);
    assert_eq!(day["totalConsumption"], 2.0);
    assert_eq!(day["avgPrice"], 2.0);

    let (_, body) = server.get_json("/electricitydata/2024-01-15").await;
    assert_eq!(body["data"][0]["productionamount"], 0.0);
    assert_eq!(body["data"][1]["consumptionamount"], 0.0);
}

#[tokio::test]
async fn test_streak_follows_start_time_not_insert_order() {
    let server = TestServer::start().await;
    server.seed(&[
        ("2024-01-15", "2024-01-15T02:00:00.000Z", Some(1.0), Some(1.0), -1.0),
        ("2024-01-15", "2024-01-15T00:00:00.000Z", Some(1.0), Some(1.0), -1.0),
        ("2024-01-15", "2024-01-15T01:00:00.000Z", Some(1.0), Some(1.0), 5.0),
    ]);

    let (_, body) = server.get_json("/electricitydata").await;
    assert_eq!(body["data"][0]["longestNegativeHours"], 1);
}

#[tokio::test]
async fn test_daily_report_is_idempotent() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[-1.0, 2.0, -3.0], 1.5, 2.5);
    seed_day(&server, "2024-01-16", &[0.5, -0.5], 1.0, 1.0);

    let (_, first) = server.get_json("/electricitydata").await;
    let (_, second) = server.get_json("/electricitydata").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_daily_range_filter() {
    let server = TestServer::start().await;
    for date in ["2024-01-14", "2024-01-15", "2024-01-16", "2024-01-17"] {
        seed_day(&server, date, &[1.0], 1.0, 1.0);
    }

    let (status, body) = server
        .get_json("/electricitydata?from=2024-01-15&to=2024-01-16")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRecords"], 2);
    assert_eq!(body["data"][0]["date"], "2024-01-15");
    assert_eq!(body["data"][1]["date"], "2024-01-16");

    let (_, body) = server.get_json("/electricitydata?from=2024-01-17").await;
    assert_eq!(body["totalRecords"], 1);
}

#[tokio::test]
async fn test_daily_bad_range_is_rejected() {
    let server = TestServer::start().await;

    let (status, body) = server.get_json("/electricitydata?from=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid date" }));

    let (status, _) = server
        .get_json("/electricitydata?from=2024-02-01&to=2024-01-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_store_returns_empty_list() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/electricitydata").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [], "totalRecords": 0 }));
}

// ---------------------------------------------------------------------------
// Hourly detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_hourly_records_shape_and_order() {
    let server = TestServer::start().await;
    server.seed(&[
        ("2024-01-15", "2024-01-15T01:00:00.000Z", Some(2.0), Some(3.0), -0.5),
        ("2024-01-15", "2024-01-15T00:00:00.000Z", Some(1.0), Some(4.0), 12.25),
    ]);

    let (status, body) = server.get_json("/electricitydata/2024-01-15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [
                {
                    "starttime": "2024-01-15T00:00:00.000Z",
                    "hourlyprice": 12.25,
                    "productionamount": 1.0,
                    "consumptionamount": 4.0
                },
                {
                    "starttime": "2024-01-15T01:00:00.000Z",
                    "hourlyprice": -0.5,
                    "productionamount": 2.0,
                    "consumptionamount": 3.0
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_hourly_day_boundaries_are_inclusive() {
    let server = TestServer::start().await;
    server.seed(&[
        ("2024-01-14", "2024-01-14T23:59:59.999Z", Some(1.0), Some(10.0), 9.0),
        ("2024-01-15", "2024-01-15T00:00:00.000Z", Some(2.0), Some(20.0), 1.0),
        ("2024-01-15", "2024-01-15T23:59:59.999Z", Some(4.0), Some(40.0), 2.0),
        ("2024-01-16", "2024-01-16T00:00:00.000Z", Some(8.0), Some(80.0), 3.0),
    ]);

    let (_, daily) = server.get_json("/electricitydata").await;
    let totals: Vec<(&str, f64, f64)> = daily["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| {
            (
                d["date"].as_str().unwrap(),
                d["totalProduction"].as_f64().unwrap(),
                d["totalConsumption"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        totals,
        vec![
            ("2024-01-14", 1.0, 10.0),
            ("2024-01-15", 6.0, 60.0),
            ("2024-01-16", 8.0, 80.0),
        ]
    );

    let (_, body) = server.get_json("/electricitydata/2024-01-15").await;
    let starts: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["starttime"].as_str().unwrap())
        .collect();
    assert_eq!(
        starts,
        vec!["2024-01-15T00:00:00.000Z", "2024-01-15T23:59:59.999Z"]
    );
}

#[tokio::test]
async fn test_hourly_rows_add_up_to_daily_totals() {
    let server = TestServer::start().await;
    server.seed(&[
        ("2024-01-15", "2024-01-14T23:00:00.000Z", Some(10.0), Some(1.0), -1.0),
        ("2024-01-15", "2024-01-15T00:00:00.000Z", Some(1.0), Some(2.0), -2.0),
        ("2024-01-16", "2024-01-16T00:00:00.000Z", Some(0.5), Some(4.0), 3.0),
    ]);

    let (_, daily) = server.get_json("/electricitydata").await;
    for day in daily["data"].as_array().unwrap() {
        let date = day["date"].as_str().unwrap();
        let (_, hourly) = server.get_json(&format!("/electricitydata/{date}")).await;
        let rows = hourly["data"].as_array().unwrap();
        let production: f64 = rows.iter().map(|r| r["productionamount"].as_f64().unwrap()).sum();
        let consumption: f64 = rows.iter().map(|r| r["consumptionamount"].as_f64().unwrap()).sum();
        assert!(production == day["totalProduction"].as_f64().unwrap(), "{date}");
        assert!(consumption == day["totalConsumption"].as_f64().unwrap(), "{date}");
    }

    let (_, hourly) = server.get_json("/electricitydata/2024-01-14").await;
    assert_eq!(hourly, json!({ "data": [] }));

    let (_, html) = server.get_text("/day/2024-01-15").await;
    assert!(html.contains("11.00"));
    assert!(html.contains("<td>23:00</td>"));
}

#[tokio::test]
async fn test_hourly_unknown_date_is_empty() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[1.0], 1.0, 1.0);

    let (status, body) = server.get_json("/electricitydata/2023-06-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_hourly_malformed_date_is_bad_request() {
    let server = TestServer::start().await;
    for path in [
        "/electricitydata/yesterday",
        "/electricitydata/2024-13-01",
        "/electricitydata/2024-1-5",
    ] {
        let (status, body) = server.get_json(path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(body, json!({ "error": "Invalid date" }));
    }
}

// ---------------------------------------------------------------------------
// Failures, prefix, health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_datastore_failure_is_internal_error() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[1.0], 1.0, 1.0);
    server.drop_table();

    let expected = json!({ "error": "Internal server error" });
    for path in ["/electricitydata", "/electricitydata/2024-01-15", "/health"] {
        let (status, body) = server.get_json(path).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(body, expected);
    }

    let (status, html) = server.get_text("/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("Internal server error"));
    assert!(!html.contains("no such table"));
}

#[tokio::test]
async fn test_api_prefix_serves_same_data() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[-1.0, 2.0], 1.0, 2.0);

    let (_, plain) = server.get_json("/electricitydata").await;
    let (status, prefixed) = server.get_json("/api/electricitydata").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plain, prefixed);

    let (_, plain) = server.get_json("/electricitydata/2024-01-15").await;
    let (_, prefixed) = server.get_json("/api/electricitydata/2024-01-15").await;
    assert_eq!(plain, prefixed);
}

#[tokio::test]
async fn test_health_reports_row_count() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[1.0, 2.0, 3.0], 1.0, 1.0);

    let (status, body) = server.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "total": 3 }));
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_lists_days_newest_first() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[1.0], 1234.5, 1.0);
    seed_day(&server, "2024-01-16", &[1.0], 1.0, 1.0);

    let (status, html) = server.get_text("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("href=\"/day/2024-01-15\""));
    assert!(html.contains("1,234.50"));
    let newer = html.find("2024-01-16</a>").unwrap();
    let older = html.find("2024-01-15</a>").unwrap();
    assert!(newer < older);
}

#[tokio::test]
async fn test_dashboard_keyword_filter_and_empty_state() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[1.0], 1.0, 1.0);
    seed_day(&server, "2024-01-16", &[1.0], 1.0, 1.0);

    let (_, html) = server.get_text("/?q=2024-01-16").await;
    assert!(html.contains("/day/2024-01-16"));
    assert!(!html.contains("/day/2024-01-15"));

    let (_, html) = server.get_text("/?f_date=01-15&f_streak=0").await;
    assert!(html.contains("/day/2024-01-15"));
    assert!(!html.contains("/day/2024-01-16"));

    let (_, html) = server.get_text("/?q=no-such-day").await;
    assert!(html.contains("No data found."));
    assert!(html.contains("Clear"));
}

#[tokio::test]
async fn test_dashboard_paging() {
    let server = TestServer::start().await;
    for day in 1..=12 {
        seed_day(&server, &format!("2024-01-{day:02}"), &[1.0], 1.0, 1.0);
    }

    let (_, html) = server.get_text("/?rows=10&page=2&sort=date&order=asc").await;
    assert!(html.contains("Page 2 of 2"));
    assert!(html.contains("/day/2024-01-11"));
    assert!(!html.contains("/day/2024-01-10\""));
}

#[tokio::test]
async fn test_day_page_lowest_price_and_chart() {
    let server = TestServer::start().await;
    seed_day(&server, "2024-01-15", &[5.0, -3.0, -3.0, 2.0], 2.5, 1.0);

    let (status, html) = server.get_text("/day/2024-01-15").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Details for 2024-01-15"));
    assert!(html.contains("Lowest price"));
    assert!(html.contains("-3.00 €"));
    assert!(html.contains("01:00"));
    assert!(html.contains("2.50"));
    assert!(html.contains("-3.000 €"));
    assert!(html.contains("<svg"));
}

#[tokio::test]
async fn test_day_page_without_hours_shows_placeholders() {
    let server = TestServer::start().await;

    let (status, html) = server.get_text("/day/2024-01-15").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<span>-</span>"));
    assert!(html.contains("No data found."));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn test_day_page_malformed_date() {
    let server = TestServer::start().await;
    let (status, html) = server.get_text("/day/not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("Invalid date"));
}
