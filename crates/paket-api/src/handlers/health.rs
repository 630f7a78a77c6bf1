//! Health check handler for service monitoring.
//!
//! A liveness probe only: confirms the HTTP server is responding without
//! touching external dependencies. Orchestration systems call it
//! frequently, so it stays allocation-light and never blocks.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status, always `ok` while the process serves
    pub status: &'static str,
    /// Service version information
    pub version: &'static str,
    /// Timestamp when the check was performed
    pub timestamp: DateTime<Utc>,
}

/// Liveness check endpoint handler.
#[instrument(name = "health_check")]
pub async fn health_check() -> Response {
    debug!("Performing health check");

    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
