//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::HealthProbe;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the resolved configuration and the database handle built at
/// startup. The handle is `None` when no pool could be created.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Option<Arc<dyn HealthProbe>>,
}

impl AppState {
    /// Creates a new application state from the given configuration and database handle.
    pub fn new(config: AppConfig, database: Option<Arc<dyn HealthProbe>>) -> Self {
        Self {
            config: Arc::new(config),
            database,
        }
    }

    /// Probe the database now. Absent handles count as unreachable.
    pub async fn database_reachable(&self) -> bool {
        match &self.database {
            Some(database) => database.ping().await.is_ok(),
            None => false,
        }
    }
}
