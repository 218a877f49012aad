//! Equipment calls

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;

use super::RemoteClient;
use crate::{
    error::RemoteError,
    models::{equipment::CreateEquipment, Equipment, EquipmentStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentApi: Send + Sync {
    /// Active equipment
    async fn list(&self) -> Result<Vec<Equipment>, RemoteError>;
    /// Every record, soft-deleted ones included
    async fn list_all(&self) -> Result<Vec<Equipment>, RemoteError>;
    /// `None` when the backend knows no such id
    async fn get(&self, id: i64) -> Result<Option<Equipment>, RemoteError>;
    async fn create(&self, data: &CreateEquipment) -> Result<Equipment, RemoteError>;
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;
    async fn update_status(&self, id: i64, status: EquipmentStatus) -> Result<(), RemoteError>;
    async fn update_maintenance_date(&self, id: i64, date: NaiveDate) -> Result<(), RemoteError>;
    async fn search(&self, text: &str) -> Result<Vec<Equipment>, RemoteError>;
    async fn filter_by_status(&self, status: &str) -> Result<Vec<Equipment>, RemoteError>;
}

#[async_trait]
impl EquipmentApi for RemoteClient {
    async fn list(&self) -> Result<Vec<Equipment>, RemoteError> {
        self.get_json("/equipment", &[]).await
    }

    async fn list_all(&self) -> Result<Vec<Equipment>, RemoteError> {
        self.get_json("/equipment/get-all", &[]).await
    }

    async fn get(&self, id: i64) -> Result<Option<Equipment>, RemoteError> {
        self.get_optional(&format!("/equipment/{}", id), &[]).await
    }

    async fn create(&self, data: &CreateEquipment) -> Result<Equipment, RemoteError> {
        self.post_json("/equipment", data).await
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.call(Method::DELETE, &format!("/equipment/{}", id), &[]).await
    }

    async fn update_status(&self, id: i64, status: EquipmentStatus) -> Result<(), RemoteError> {
        self.call(
            Method::PUT,
            &format!("/equipment/{}/status", id),
            &[("status", status.to_string())],
        )
        .await
    }

    async fn update_maintenance_date(&self, id: i64, date: NaiveDate) -> Result<(), RemoteError> {
        self.call(
            Method::PUT,
            &format!("/equipment/{}/Maintenance", id),
            &[("maintenanceDate", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    async fn search(&self, text: &str) -> Result<Vec<Equipment>, RemoteError> {
        self.get_json("/equipment/search", &[("Search", text.to_string())])
            .await
    }

    async fn filter_by_status(&self, status: &str) -> Result<Vec<Equipment>, RemoteError> {
        self.get_json("/equipment/filter-by-status", &[("status", status.to_string())])
            .await
    }
}
