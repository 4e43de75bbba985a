//! Service info endpoint.

use axum::extract::State;
use serde::Serialize;

use crate::config::{Environment, API_ENDPOINTS};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub version: &'static str,
    pub environment: Environment,
    pub endpoints: Vec<&'static str>,
}

/// Reports the build version, the resolved environment and the known routes.
pub async fn info(State(state): State<AppState>) -> ApiResponse<ServiceInfo> {
    ApiResponse::ok(ServiceInfo {
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment,
        endpoints: API_ENDPOINTS.to_vec(),
    })
}
