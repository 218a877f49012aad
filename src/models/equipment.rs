//! Equipment model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::enums::EquipmentStatus;

/// Equipment record (read copy of the remote API's entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub status: EquipmentStatus,
    #[serde(default, with = "super::dates::day_option")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, with = "super::dates::day_option")]
    pub last_maintenance_date: Option<NaiveDate>,
    #[serde(default, with = "super::dates::day_option")]
    pub warranty_expiry: Option<NaiveDate>,
    /// Soft-delete flag; never written by this service
    #[serde(default)]
    pub deleted: bool,
}

/// Create equipment request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Equipment name is required"))]
    pub name: String,
    pub category: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
}

/// Equipment status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipmentStatus {
    pub status: EquipmentStatus,
}

/// Equipment last-maintenance date update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentMaintenanceDate {
    pub maintenance_date: NaiveDate,
}
