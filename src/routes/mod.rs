//! HTTP route handlers for the JSON API.
//!
//! Every route lives under [`API_PREFIX`] and passes through the request log
//! middleware. Unknown paths under the prefix get an unlogged JSON not-found
//! envelope;
//! the CORS layer wraps the whole router so preflights are answered before
//! routing.

pub mod health;
pub mod info;
pub mod users;

use axum::{extract::OriginalUri, middleware, routing::get, Router};

use crate::config::{API_PREFIX, HEALTH_ROUTE, INFO_ROUTE, USERS_ROUTE};
use crate::cors::cors_layer;
use crate::error::AppError;
use crate::middleware::request_log_layer;
use crate::state::AppState;

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Creates the Axum router with all routes, logging and CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let api_routes = Router::new()
        .route(HEALTH_ROUTE, get(health::health))
        .route(INFO_ROUTE, get(info::info))
        .route(USERS_ROUTE, get(users::list))
        .route_layer(middleware::from_fn(request_log_layer))
        .fallback(not_found);

    Router::new()
        .nest(API_PREFIX, api_routes)
        .with_state(state)
        .layer(cors)
}
