//! Maintenance schedule models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::MaintenanceStatus;

/// Maintenance types offered as suggestions when creating a schedule.
/// The field itself is free text.
pub const MAINTENANCE_TYPE_SUGGESTIONS: &[&str] = &[
    "Preventive",
    "Corrective",
    "Predictive",
    "Routine",
    "Emergency",
    "Condition-based",
    "Breakdown",
];

/// Maintenance schedule record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub schedule_id: i64,
    /// Referenced equipment (not owned)
    #[serde(default)]
    pub equipment_id: Option<i64>,
    #[serde(default)]
    pub maintenance_type: String,
    #[serde(with = "super::dates::day")]
    #[schema(value_type = String, format = Date)]
    pub maintenance_date: NaiveDate,
    #[serde(default)]
    pub status: MaintenanceStatus,
    /// Absent costs count as zero
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub maintenance_cost: Option<Decimal>,
    #[serde(default)]
    pub technician: Option<String>,
    #[serde(default)]
    pub maintenance_description: Option<String>,
}

impl MaintenanceSchedule {
    pub fn cost(&self) -> Decimal {
        self.maintenance_cost.unwrap_or(Decimal::ZERO)
    }
}

/// Create maintenance schedule request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceSchedule {
    pub equipment_id: i64,
    #[validate(length(min = 1, message = "Maintenance type is required"))]
    pub maintenance_type: String,
    #[serde(with = "super::dates::day")]
    #[schema(value_type = String, format = Date)]
    pub maintenance_date: NaiveDate,
    #[serde(default)]
    pub maintenance_description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub maintenance_cost: Option<Decimal>,
    #[validate(length(min = 1, message = "Technician name is required"))]
    pub technician: String,
    #[serde(default)]
    pub status: MaintenanceStatus,
}

/// Maintenance date update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceDate {
    #[serde(with = "super::dates::day")]
    #[schema(value_type = String, format = Date)]
    pub maintenance_date: NaiveDate,
}

/// Maintenance cost update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceCost {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub maintenance_cost: Decimal,
}

/// Technician update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnician {
    #[validate(length(min = 1, message = "Technician name is required"))]
    pub technician: String,
}

/// Description update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceDescription {
    pub maintenance_description: String,
}

/// Query parameters for filtered maintenance listings.
/// Every dimension defaults to `ALL`.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceFilterQuery {
    /// Status name or ALL
    pub status: Option<String>,
    /// Maintenance type or ALL
    #[serde(rename = "type")]
    pub maintenance_type: Option<String>,
    /// Equipment id or ALL
    pub equipment_id: Option<String>,
}

/// Values offered by the maintenance filter panel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceFilterOptions {
    pub statuses: Vec<MaintenanceStatus>,
    /// Types present in the data followed by unused suggestions
    pub maintenance_types: Vec<String>,
    pub equipment_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_remote_schedule() {
        let json = r#"{
            "scheduleId": 12,
            "equipmentId": 4,
            "maintenanceType": "Preventive",
            "maintenanceDate": "2024-05-10T00:00:00.000+00:00",
            "maintenanceDescription": "Belt check",
            "status": "INPROGRESS",
            "technician": "Wei Chen",
            "maintenanceCost": 1250.5
        }"#;
        let schedule: MaintenanceSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.maintenance_date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(schedule.status, MaintenanceStatus::InProgress);
        assert_eq!(schedule.cost(), dec!(1250.5));
    }

    #[test]
    fn test_missing_cost_is_zero() {
        let json = r#"{
            "scheduleId": 1,
            "maintenanceType": "Routine",
            "maintenanceDate": "2024-01-02",
            "maintenanceCost": null
        }"#;
        let schedule: MaintenanceSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.cost(), Decimal::ZERO);
        assert_eq!(schedule.status, MaintenanceStatus::Scheduled);
        assert_eq!(schedule.equipment_id, None);
    }

    #[test]
    fn test_serialize_keeps_wire_shape() {
        let schedule = MaintenanceSchedule {
            schedule_id: 3,
            equipment_id: Some(9),
            maintenance_type: "Corrective".to_string(),
            maintenance_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            status: MaintenanceStatus::Completed,
            maintenance_cost: Some(dec!(80)),
            technician: None,
            maintenance_description: None,
        };
        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value["maintenanceDate"], "2024-02-29");
        assert_eq!(value["maintenanceCost"], 80.0);
        assert_eq!(value["status"], "COMPLETED");
    }
}
