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

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// Page sizes offered by the daily table.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    /// IANA timezone used for displayed hours; stored data is always UTC.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8100
}

fn default_db_path() -> String {
    "./data/electricity.db".to_owned()
}

fn default_rows_per_page() -> usize {
    25
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

fn default_chart_width() -> u32 {
    900
}

fn default_chart_height() -> u32 {
    350
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            timezone: default_timezone(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

impl DashboardSettings {
    /// Display timezone; falls back to UTC for names that fail to parse.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            bail!("database.path must be set");
        }
        if !ROWS_PER_PAGE_OPTIONS.contains(&self.dashboard.rows_per_page) {
            bail!(
                "dashboard.rows_per_page must be one of {ROWS_PER_PAGE_OPTIONS:?}, got {}",
                self.dashboard.rows_per_page
            );
        }
        if self.dashboard.timezone.parse::<Tz>().is_err() {
            bail!(
                "dashboard.timezone is not a valid IANA timezone: {}",
                self.dashboard.timezone
            );
        }
        if self.dashboard.chart_width == 0 || self.dashboard.chart_height == 0 {
            bail!("dashboard.chart_width and dashboard.chart_height must be positive");
        }
        Ok(())
    }
}
