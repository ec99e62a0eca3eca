//! Application State Management
//!
//! The application state holds the store handle and the configuration it was
//! built from. It is constructed once in `main` and handed to every handler
//! through `web::Data`.

use std::sync::Arc;

use log::info;

use crate::config::AppConfig;
use crate::error::TodoError;
use crate::store::{config::create_store, mock_store::MockTodoStore, TodoStore};

/// Application state shared by all workers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub config: AppConfig,
}

impl AppState {
    /// Build the state from configuration, opening the configured store
    pub fn from_config(config: AppConfig) -> Result<Self, TodoError> {
        info!("Initializing application state with {:?} backend", config.database.backend);
        let store = create_store(&config.database)?;
        info!("Application state initialized successfully");
        Ok(Self { store, config })
    }

    /// Wrap an already constructed store
    pub fn with_store(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            config: AppConfig::default(),
        }
    }

    /// Application state backed by a fresh mock store
    pub fn new_for_testing() -> Self {
        Self::with_store(Arc::new(MockTodoStore::new()))
    }
}
