//! Maintenance schedule calls

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use rust_decimal::Decimal;

use super::RemoteClient;
use crate::{
    error::RemoteError,
    models::{maintenance::CreateMaintenanceSchedule, MaintenanceSchedule, MaintenanceStatus},
};

const BASE: &str = "/maintenance-schedule";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceApi: Send + Sync {
    async fn list(&self) -> Result<Vec<MaintenanceSchedule>, RemoteError>;
    /// `None` when the backend knows no such id
    async fn get(&self, id: i64) -> Result<Option<MaintenanceSchedule>, RemoteError>;
    async fn create(&self, data: &CreateMaintenanceSchedule) -> Result<MaintenanceSchedule, RemoteError>;
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
    async fn update_date(&self, id: i64, date: NaiveDate) -> Result<(), RemoteError>;
    async fn update_status(&self, id: i64, status: MaintenanceStatus) -> Result<(), RemoteError>;
    async fn update_cost(&self, id: i64, cost: Decimal) -> Result<(), RemoteError>;
    async fn update_technician(&self, id: i64, technician: &str) -> Result<(), RemoteError>;
    async fn update_description(&self, id: i64, description: &str) -> Result<(), RemoteError>;
    async fn filter_by_status(&self, status: &str) -> Result<Vec<MaintenanceSchedule>, RemoteError>;
    async fn filter_by_type(&self, maintenance_type: &str) -> Result<Vec<MaintenanceSchedule>, RemoteError>;
    async fn filter_by_equipment(&self, equipment_id: &str) -> Result<Vec<MaintenanceSchedule>, RemoteError>;
}

impl RemoteClient {
    async fn put_schedule_field(&self, id: i64, field: &str, key: &str, value: String) -> Result<(), RemoteError> {
        self.call(Method::PUT, &format!("{}/{}/{}", BASE, id, field), &[(key, value)])
            .await
    }
}

#[async_trait]
impl MaintenanceApi for RemoteClient {
    async fn list(&self) -> Result<Vec<MaintenanceSchedule>, RemoteError> {
        self.get_json(BASE, &[]).await
    }

    async fn get(&self, id: i64) -> Result<Option<MaintenanceSchedule>, RemoteError> {
        self.get_optional(&format!("{}/{}", BASE, id), &[]).await
    }

    async fn create(&self, data: &CreateMaintenanceSchedule) -> Result<MaintenanceSchedule, RemoteError> {
        self.post_json(BASE, data).await
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.call(Method::DELETE, &format!("{}/{}", BASE, id), &[]).await
    }

    async fn update_date(&self, id: i64, date: NaiveDate) -> Result<(), RemoteError> {
        self.put_schedule_field(id, "MaintenanceDate", "date", date.format("%Y-%m-%d").to_string())
            .await
    }

    async fn update_status(&self, id: i64, status: MaintenanceStatus) -> Result<(), RemoteError> {
        self.put_schedule_field(id, "status", "status", status.to_string()).await
    }

    async fn update_cost(&self, id: i64, cost: Decimal) -> Result<(), RemoteError> {
        self.put_schedule_field(id, "cost", "cost", cost.normalize().to_string()).await
    }

    async fn update_technician(&self, id: i64, technician: &str) -> Result<(), RemoteError> {
        self.put_schedule_field(id, "technician", "technician", technician.to_string())
            .await
    }

    async fn update_description(&self, id: i64, description: &str) -> Result<(), RemoteError> {
        self.put_schedule_field(id, "description", "description", description.to_string())
            .await
    }

    async fn filter_by_status(&self, status: &str) -> Result<Vec<MaintenanceSchedule>, RemoteError> {
        self.get_json(&format!("{}/filter-by-status", BASE), &[("status", status.to_string())])
            .await
    }

    async fn filter_by_type(&self, maintenance_type: &str) -> Result<Vec<MaintenanceSchedule>, RemoteError> {
        self.get_json(
            &format!("{}/filter-by-type", BASE),
            &[("type", maintenance_type.to_string())],
        )
        .await
    }

    async fn filter_by_equipment(&self, equipment_id: &str) -> Result<Vec<MaintenanceSchedule>, RemoteError> {
        self.get_json(
            &format!("{}/filter-by-equipmentId", BASE),
            &[("equipmentId", equipment_id.to_string())],
        )
        .await
    }
}
