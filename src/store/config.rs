//! Configuration for todo storage backends

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::DatabaseConfig;
use crate::error::TodoError;
use crate::store::{mock_store::MockTodoStore, sqlite_store::SqliteTodoStore, TodoStore};

/// Available todo storage backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    SQLite,
    Mock,
}

impl std::str::FromStr for DatabaseBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(DatabaseBackend::SQLite),
            "mock" | "memory" => Ok(DatabaseBackend::Mock),
            _ => Err(format!("Unknown database backend: {}", s)),
        }
    }
}

/// Create the store selected by `config`.
///
/// For SQLite this opens the database and runs the schema initializer, so an
/// error here means the service cannot operate.
pub fn create_store(config: &DatabaseConfig) -> Result<Arc<dyn TodoStore>, TodoError> {
    match config.backend {
        DatabaseBackend::SQLite => {
            let connection_string = config.connection_string()?;
            info!("Creating SQLite todo store (wal_mode: {})", config.wal_mode);
            Ok(Arc::new(SqliteTodoStore::open(&connection_string, config.wal_mode)?))
        }
        DatabaseBackend::Mock => {
            info!("Creating mock todo store");
            Ok(Arc::new(MockTodoStore::new()))
        }
    }
}
