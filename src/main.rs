use std::process;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info, warn};

use todo_drive::api;
use todo_drive::app_state::AppState;
use todo_drive::config::AppConfig;
use todo_drive::cors::Cors;
use todo_drive::logging::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    init_logging(&config.logging);

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        info!("Loaded configuration from {}", config_path.display());
    } else {
        warn!("No {} found, using defaults and environment", config_path.display());
    }

    let server = config.server.clone();
    let state = match AppState::from_config(config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Cannot initialize todo store: {}", e);
            process::exit(1);
        }
    };

    info!("Starting server on {}:{}", server.host, server.port);
    let mut http = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors)
            .wrap(Logger::default())
            .configure(api::configure)
    });
    if let Some(workers) = server.workers {
        http = http.workers(workers.get());
    }

    let http = http.bind((server.host.as_str(), server.port)).map_err(|e| {
        error!("Cannot bind {}:{}: {}", server.host, server.port, e);
        e
    })?;
    http.run().await
}
