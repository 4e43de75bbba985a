//! Health check endpoint.
//!
//! The overall status is always `healthy`: the process answering is the
//! liveness signal. The `database` field is informational and comes from a
//! fresh probe on every request.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Name reported in the `service` field
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub database: DatabaseStatus,
    pub time: DateTime<Utc>,
}

/// Health check handler.
#[instrument(name = "health::health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.database_reachable().await {
        DatabaseStatus::Connected
    } else {
        DatabaseStatus::Disconnected
    };

    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        database,
        time: Utc::now(),
    })
}
