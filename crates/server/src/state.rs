//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::glpi::GlpiClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    glpi: Option<GlpiClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The GLPI client is only constructed when the configuration
    /// carries GLPI credentials; without them the ordering endpoint
    /// reports the bridge as unavailable.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let glpi = config.glpi.as_ref().map(GlpiClient::new);

        Self {
            inner: Arc::new(AppStateInner { config, pool, glpi }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the GLPI helpdesk client, if configured.
    #[must_use]
    pub fn glpi(&self) -> Option<&GlpiClient> {
        self.inner.glpi.as_ref()
    }
}
