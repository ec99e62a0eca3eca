//! Error taxonomy shared by the store, configuration and HTTP layers

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::{error, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Database(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TodoError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        TodoError::BadRequest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TodoError::Config(msg.into())
    }
}

impl ResponseError for TodoError {
    fn status_code(&self) -> StatusCode {
        match self {
            TodoError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
