//! GymOps Server
//!
//! REST JSON API over a gym backend: equipment, maintenance schedules,
//! support tickets and monthly maintenance costs, with the status
//! workflows, filter pipeline, calendar index and cost statistics that
//! sit between the dashboard and the backend.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod remote;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
