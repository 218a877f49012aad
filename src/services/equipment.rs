//! Equipment service

use chrono::NaiveDate;
use std::{sync::Arc, time::Duration};
use validator::Validate;

use super::{fetcher, found, present};
use crate::{
    error::AppResult,
    lifecycle::{
        apply_filters,
        filters::{RemoteFetchers, STATUS},
    },
    models::{equipment::CreateEquipment, Equipment, EquipmentStatus, FilterCriteria, FilterValue},
    remote::EquipmentApi,
};

#[derive(Clone)]
pub struct EquipmentService {
    api: Arc<dyn EquipmentApi>,
    filter_timeout: Duration,
}

impl EquipmentService {
    pub fn new(api: Arc<dyn EquipmentApi>, filter_timeout: Duration) -> Self {
        Self { api, filter_timeout }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        Ok(self.api.list().await?)
    }

    /// Every record including soft-deleted equipment
    pub async fn list_with_deleted(&self) -> AppResult<Vec<Equipment>> {
        Ok(self.api.list_all().await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Equipment> {
        present(self.api.get(id).await, || format!("Equipment {} not found", id))
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let equipment = self.api.create(data).await?;
        tracing::info!(id = equipment.id, name = %equipment.name, "Equipment created");
        Ok(equipment)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        found(self.api.delete(id).await, || format!("Equipment {} not found", id))
    }

    pub async fn update_status(&self, id: i64, status: EquipmentStatus) -> AppResult<Equipment> {
        found(self.api.update_status(id, status).await, || {
            format!("Equipment {} not found", id)
        })?;
        self.get(id).await
    }

    pub async fn update_maintenance_date(&self, id: i64, date: NaiveDate) -> AppResult<Equipment> {
        found(self.api.update_maintenance_date(id, date).await, || {
            format!("Equipment {} not found", id)
        })?;
        self.get(id).await
    }

    /// Free-text search; a blank query lists everything
    pub async fn search(&self, text: &str) -> AppResult<Vec<Equipment>> {
        let text = text.trim();
        if text.is_empty() {
            return self.list().await;
        }
        Ok(self.api.search(text).await?)
    }

    /// Status filter through the pipeline; `ALL` lists everything
    pub async fn filter(&self, status: Option<&str>) -> AppResult<Vec<Equipment>> {
        let criteria = FilterCriteria::new().with(STATUS, FilterValue::parse(status));
        let baseline = if criteria.is_unconstrained() {
            self.list().await?
        } else {
            Vec::new()
        };
        let fetchers = RemoteFetchers::new().with(
            STATUS,
            fetcher(self.api.clone(), self.filter_timeout, |api, value| async move {
                api.filter_by_status(&value).await
            }),
        );

        let result = apply_filters(&baseline, &criteria, &fetchers).await?;
        Ok(result.into_owned())
    }
}
