// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vgarden-Tracker API Server
//!
//! Records activities of vertical urban gardens and serves per-garden,
//! per-user and system-wide statistics computed from them.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vgarden_tracker::{config::Config, db::FirestoreDb, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        top_gardens = config.stats.top_gardens,
        recent_activity_limit = config.stats.recent_activity_limit,
        trend_window_days = config.stats.trend_window_days,
        harvest_policy = ?config.stats.harvest_policy,
        "Starting Vgarden-Tracker API"
    );

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    // Build router
    let app = vgarden_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vgarden_tracker=debug,info")),
        )
        .with(format)
        .init();
}
