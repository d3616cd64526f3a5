//! IPS Progresando maintenance server
//!
//! Computes maintenance due dates and urgency for the equipment inventory
//! kept by the remote IPS Progresando API, and serves fleet status, alert
//! lists and badge counts to the browser front end.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
