// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keep-alive HTTP server built on axum.
//!
//! Hosting platforms that sleep idle services poll these endpoints; both
//! `/` and `/health` answer with the same status document.

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use ombuds_config::model::ServerConfig;
use ombuds_core::error::OmbudsError;

/// Shared state for the health handlers.
#[derive(Clone)]
struct HealthState {
    /// Process start time for uptime calculation.
    start_time: Instant,
}

/// Response body for `/` and `/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Human-readable liveness message.
    pub message: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// ISO 8601 timestamp.
    pub timestamp: String,
}

/// Start the keep-alive HTTP server.
///
/// Binds to the configured host:port and serves until the cancellation
/// token fires.
pub async fn start_health_server(
    config: &ServerConfig,
    cancel: CancellationToken,
) -> Result<(), OmbudsError> {
    let state = HealthState {
        start_time: Instant::now(),
    };

    let app = Router::new()
        .route("/", get(get_health))
        .route("/health", get(get_health))
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OmbudsError::Channel {
            message: format!("failed to bind health server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("health server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| OmbudsError::Channel {
            message: format!("health server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

async fn get_health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Bot is running!".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
