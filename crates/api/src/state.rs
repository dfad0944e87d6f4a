use std::sync::Arc;

use rallycontrol_core::error::CoreError;

use crate::config::ServerConfig;
use crate::screens::ScreenRegistry;
use crate::templates::Templates;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything except the pool is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rallycontrol_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Compiled page templates.
    pub templates: Arc<Templates>,
    /// Resolved list screens for the master-data entities.
    pub screens: Arc<ScreenRegistry>,
}

impl AppState {
    /// Compile templates and resolve the screen registry.
    ///
    /// Fails with [`CoreError::Config`] when a template does not parse or a
    /// screen declares a column its entity does not provide.
    pub fn new(pool: rallycontrol_db::DbPool, config: ServerConfig) -> Result<Self, CoreError> {
        Ok(Self {
            pool,
            config: Arc::new(config),
            templates: Arc::new(Templates::new()?),
            screens: Arc::new(ScreenRegistry::build()?),
        })
    }
}
