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

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fluxion_stats_server::config::ServerConfig;
use fluxion_stats_server::db::Database;
use fluxion_stats_server::{AppState, build_router};

#[derive(Parser)]
#[command(name = "fluxion-stats-server")]
#[command(author, version, about = "Electricity price, production and consumption statistics server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "server_config.toml")]
    config: String,
}

/// Log the row count at startup. A failed count is reported as such, never as zero rows.
fn log_record_count(db: &Database, path: &str) -> Option<u64> {
    match db.record_count() {
        Ok(records) => {
            info!(path, records, "Database opened");
            Some(records)
        }
        Err(e) => {
            warn!(path, error = %e, "Database opened but the electricity table could not be read");
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fluxion_stats_server=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    info!(path = %cli.config, "Loading configuration");
    let config = ServerConfig::from_file(&cli.config)?;

    let db = Arc::new(Database::open(&config.database.path)?);
    log_record_count(&db, &config.database.path);

    let app = build_router(AppState {
        db,
        dashboard: Arc::new(config.dashboard),
    });

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("FluxION stats server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
