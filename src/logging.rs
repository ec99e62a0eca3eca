//! Logger setup: log4rs when its YAML file is present, env_logger otherwise

use std::path::Path;

use log::info;

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) {
    let path = Path::new(&config.config_file);
    if path.exists() {
        match log4rs::init_file(path, Default::default()) {
            Ok(()) => {
                info!("Logging configured from {}", path.display());
                return;
            }
            Err(e) => eprintln!("Failed to load log config {}: {}", path.display(), e),
        }
    }

    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        info!("No usable log config at {}, logging to stderr", path.display());
    }
}
