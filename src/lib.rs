// src/lib.rs

pub mod api;
pub mod app_state;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod store;
pub mod todo;
