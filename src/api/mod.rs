//! API handlers for GymOps REST endpoints

pub mod costs;
pub mod equipment;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod tickets;

use serde::Deserialize;
use utoipa::ToSchema;

/// Requested status for a maintenance schedule or ticket
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    /// Status name, e.g. `COMPLETED` or `IN_PROGRESS`
    pub status: String,
}
