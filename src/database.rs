//! PostgreSQL connection pool with a best-effort startup probe.
//!
//! The pool is opened lazily: building it performs no network I/O, so the
//! only way `open` fails is an unparseable connection string. Reachability is
//! never cached; every call to [`HealthProbe::ping`] makes a fresh round-trip,
//! which lets a database that comes up after startup be reported as
//! connected without restarting the process.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;

use crate::config::{
    DatabaseConfig, DB_IDLE_TIMEOUT_SECS, DB_MAX_LIFETIME_SECS, DB_MAX_OPEN_CONNECTIONS,
};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Invalid database connection string: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("Database unreachable: {0}")]
    Unreachable(#[source] sqlx::Error),

    #[error("Database probe timed out after {0:?}")]
    ProbeTimedOut(Duration),
}

/// A backend whose reachability can be checked on demand.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Perform one liveness round-trip.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Pool sizing applied to every connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub max_open: u32,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
    /// Deadline for a single liveness probe
    pub probe_timeout: Duration,
}

impl PoolLimits {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_open: DB_MAX_OPEN_CONNECTIONS,
            idle_timeout: Duration::from_secs(DB_IDLE_TIMEOUT_SECS),
            max_lifetime: Duration::from_secs(DB_MAX_LIFETIME_SECS),
            acquire_timeout: Duration::from_secs(config.acquire_timeout_seconds),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        }
    }
}

/// Process-wide database handle. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    options: PgConnectOptions,
    probe_timeout: Duration,
}

impl Database {
    /// Build a lazy pool for `url`. No connection is attempted here.
    pub fn open(url: &str, limits: PoolLimits) -> Result<Self, DatabaseError> {
        let options = PgConnectOptions::from_str(url).map_err(DatabaseError::InvalidUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(limits.max_open)
            .min_connections(0)
            .idle_timeout(limits.idle_timeout)
            .max_lifetime(limits.max_lifetime)
            .acquire_timeout(limits.acquire_timeout)
            .connect_lazy_with(options.clone());

        Ok(Self {
            pool,
            options,
            probe_timeout: limits.probe_timeout,
        })
    }

    /// Round-trip through the pool. With no live pooled connection, a direct
    /// connection is tried first: the pool retries refused connections until
    /// its acquire timeout, a direct connect fails on the first refusal.
    async fn probe(&self) -> Result<(), sqlx::Error> {
        if self.pool.size() == 0 {
            let connection = PgConnection::connect_with(&self.options).await?;
            connection.close().await?;
        }

        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection. Further pings fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> Result<(), DatabaseError> {
        match tokio::time::timeout(self.probe_timeout, self.probe()).await {
            Ok(result) => result.map_err(DatabaseError::Unreachable),
            Err(_) => Err(DatabaseError::ProbeTimedOut(self.probe_timeout)),
        }
    }
}

/// Outcome of the startup connection attempt.
#[derive(Debug)]
pub enum DatabaseInit {
    /// Pool opened and the first probe succeeded.
    Connected(Database),
    /// Pool opened but the first probe failed; later probes may succeed.
    Unreachable {
        database: Database,
        error: DatabaseError,
    },
    /// No pool could be built.
    Unavailable(DatabaseError),
}

impl DatabaseInit {
    /// The handle to carry into request handling, if one was built.
    pub fn into_database(self) -> Option<Database> {
        match self {
            DatabaseInit::Connected(database) => Some(database),
            DatabaseInit::Unreachable { database, .. } => Some(database),
            DatabaseInit::Unavailable(_) => None,
        }
    }
}

/// Open the pool and probe it once.
pub async fn connect(url: &str, limits: PoolLimits) -> DatabaseInit {
    let database = match Database::open(url, limits) {
        Ok(database) => database,
        Err(error) => return DatabaseInit::Unavailable(error),
    };

    match database.ping().await {
        Ok(()) => DatabaseInit::Connected(database),
        Err(error) => DatabaseInit::Unreachable { database, error },
    }
}
