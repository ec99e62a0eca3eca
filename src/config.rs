//! Application Configuration
//!
//! Configuration is read from a YAML file with sensible defaults, then
//! overridden by environment variables.

use std::env;
use std::fmt::Display;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::store::config::DatabaseBackend;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; actix picks the CPU count when unset. Zero is rejected
    /// when parsing.
    pub workers: Option<NonZeroUsize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// Database configuration
///
/// Either `url` is given directly or the connection string is assembled from
/// the discrete fields, see [`DatabaseConfig::connection_string`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Database name; for the embedded backend this is the file path
    pub name: String,
    pub wal_mode: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: None,
            host: None,
            port: None,
            user: None,
            password: None,
            name: "todo.db".to_string(),
            wal_mode: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Path to the log4rs configuration file
    pub config_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            config_file: "server_log.yaml".to_string(),
        }
    }
}

impl AppConfig {
    /// Location of the configuration file: `TODO_CONFIG` or `config.yaml`
    pub fn config_path() -> PathBuf {
        env::var("TODO_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load the configuration file if present, then apply the process
    /// environment on top.
    pub fn load() -> Result<Self, TodoError> {
        let mut config = Self::from_file(Self::config_path())?;
        config.apply_env_from(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML configuration file, falling back to defaults when the
    /// file does not exist
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TodoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Override fields from environment-style variables resolved by `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), TodoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(workers) = lookup("WORKERS") {
            self.server.workers = Some(parse_var("WORKERS", &workers)?);
        }

        let db = &mut self.database;
        if let Some(backend) = lookup("TODO_BACKEND") {
            db.backend = backend.parse().map_err(TodoError::Config)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            db.url = Some(url);
        }
        if let Some(host) = lookup("DB_HOST") {
            db.host = Some(host);
        }
        if let Some(port) = lookup("DB_PORT") {
            db.port = Some(parse_var("DB_PORT", &port)?);
        }
        if let Some(user) = lookup("DB_USER") {
            db.user = Some(user);
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            db.password = Some(password);
        }
        if let Some(name) = lookup("DB_NAME") {
            db.name = name;
        }
        if let Some(wal) = lookup("DB_WAL") {
            db.wal_mode = parse_var("DB_WAL", &wal)?;
        }

        if let Some(file) = lookup("LOG_CONFIG") {
            self.logging.config_file = file;
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, TodoError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| TodoError::config(format!("{}={:?}: {}", name, value, e)))
}

impl DatabaseConfig {
    /// Resolve the string handed to the database driver.
    ///
    /// A configured `url` wins; `sqlite://` and `sqlite:` prefixes are
    /// stripped so `sqlite::memory:` and `sqlite://./todo.db` work. Otherwise
    /// the string is assembled from the discrete fields. The embedded
    /// database lives on this machine, so only local hosts are accepted and
    /// port and credentials have no effect.
    pub fn connection_string(&self) -> Result<String, TodoError> {
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            let target = strip_sqlite_scheme(url);
            if target.contains("://") && !target.starts_with("file:") {
                return Err(TodoError::config(format!("unsupported database URL: {}", url)));
            }
            return Ok(target.to_string());
        }

        if let Some(host) = self.host.as_deref().filter(|h| !is_local_host(h)) {
            return Err(TodoError::config(format!(
                "database host {} is not local; the embedded database only opens local files",
                host
            )));
        }
        if self.port.is_some() || self.user.is_some() || self.password.is_some() {
            warn!("Database port and credentials are ignored by the embedded database");
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(TodoError::config("database name is empty"));
        }
        Ok(name.to_string())
    }
}

fn strip_sqlite_scheme(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

fn is_local_host(host: &str) -> bool {
    matches!(host.trim(), "" | "localhost" | "127.0.0.1" | "::1")
}
