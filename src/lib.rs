//! starter-api: a minimal JSON API skeleton.
//!
//! Three read-only endpoints under `/api` (health, info, users), CORS for
//! the development frontend, per-request logging, and a PostgreSQL pool that
//! is probed at startup and on every health check. The service keeps running
//! when the database is unavailable.

pub mod config;
pub mod cors;
pub mod database;
pub mod error;
pub mod http;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
