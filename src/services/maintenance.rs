//! Maintenance schedule service

use chrono::{Local, NaiveDate};
use indexmap::IndexSet;
use rust_decimal::Decimal;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use utoipa::ToSchema;
use validator::Validate;

use super::{fetcher, found, present};
use crate::{
    error::{AppError, AppResult},
    lifecycle::{
        apply_filters,
        calendar::{self, DayIndex, MonthGrid, YearMonth},
        filters::{RemoteFetchers, EQUIPMENT_ID, STATUS, TYPE},
        workflow,
    },
    models::{
        maintenance::{
            CreateMaintenanceSchedule, MaintenanceFilterOptions, MaintenanceFilterQuery,
            MAINTENANCE_TYPE_SUGGESTIONS,
        },
        FilterCriteria, FilterValue, MaintenanceSchedule, MaintenanceStatus,
    },
    remote::{CostApi, EquipmentApi, MaintenanceApi},
};

/// Outcome of a status change. The change itself succeeded; `warnings`
/// lists follow-up writes that did not.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub schedule: MaintenanceSchedule,
    pub warnings: Vec<String>,
}

/// Three-month calendar around a center month
#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarView {
    #[schema(value_type = Vec<String>)]
    pub window: calendar::Window,
    pub months: Vec<MonthGrid>,
}

#[derive(Clone)]
pub struct MaintenanceService {
    api: Arc<dyn MaintenanceApi>,
    equipment: Arc<dyn EquipmentApi>,
    costs: Arc<dyn CostApi>,
    filter_timeout: Duration,
}

impl MaintenanceService {
    pub fn new(
        api: Arc<dyn MaintenanceApi>,
        equipment: Arc<dyn EquipmentApi>,
        costs: Arc<dyn CostApi>,
        filter_timeout: Duration,
    ) -> Self {
        Self {
            api,
            equipment,
            costs,
            filter_timeout,
        }
    }

    /// All schedules, most recent date first
    pub async fn list(&self) -> AppResult<Vec<MaintenanceSchedule>> {
        let mut schedules = self.api.list().await?;
        sort_by_date_desc(&mut schedules);
        Ok(schedules)
    }

    pub async fn get(&self, id: i64) -> AppResult<MaintenanceSchedule> {
        present(self.api.get(id).await, || not_found(id))
    }

    pub async fn create(&self, data: &CreateMaintenanceSchedule) -> AppResult<MaintenanceSchedule> {
        self.create_on(data, Local::now().date_naive()).await
    }

    /// Create a schedule as of `today`
    pub async fn create_on(
        &self,
        data: &CreateMaintenanceSchedule,
        today: NaiveDate,
    ) -> AppResult<MaintenanceSchedule> {
        data.validate()?;
        if data.equipment_id <= 0 {
            return Err(AppError::Validation("Equipment ID is required".to_string()));
        }
        if let Some(cost) = data.maintenance_cost {
            check_cost(cost)?;
        }
        if data.status == MaintenanceStatus::Scheduled && data.maintenance_date < today {
            return Err(AppError::Validation(
                "Scheduled maintenance date cannot be in the past".to_string(),
            ));
        }

        let schedule = self.api.create(data).await?;
        tracing::info!(
            id = schedule.schedule_id,
            equipment_id = data.equipment_id,
            "Maintenance schedule created"
        );

        if let Err(e) = self.costs.recompute().await {
            tracing::warn!(error = %e, "Monthly cost recompute failed after schedule creation");
        }
        Ok(schedule)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        found(self.api.delete(id).await, || not_found(id))
    }

    pub async fn update_date(&self, id: i64, date: NaiveDate) -> AppResult<MaintenanceSchedule> {
        found(self.api.update_date(id, date).await, || not_found(id))?;
        self.get(id).await
    }

    pub async fn update_cost(&self, id: i64, cost: Decimal) -> AppResult<MaintenanceSchedule> {
        check_cost(cost)?;
        found(self.api.update_cost(id, cost).await, || not_found(id))?;
        self.get(id).await
    }

    pub async fn update_technician(&self, id: i64, technician: &str) -> AppResult<MaintenanceSchedule> {
        if technician.trim().is_empty() {
            return Err(AppError::Validation("Technician name is required".to_string()));
        }
        found(self.api.update_technician(id, technician.trim()).await, || {
            not_found(id)
        })?;
        self.get(id).await
    }

    pub async fn update_description(&self, id: i64, description: &str) -> AppResult<MaintenanceSchedule> {
        found(self.api.update_description(id, description).await, || {
            not_found(id)
        })?;
        self.get(id).await
    }

    /// Move a schedule to `proposed`. Completing a schedule also stamps the
    /// equipment's last maintenance date; if that write fails the status
    /// change stands and the failure is reported in `warnings`.
    pub async fn change_status(&self, id: i64, proposed: &str) -> AppResult<StatusChange> {
        let mut schedule = self.get(id).await?;
        let next = workflow::parse_and_check(schedule.status, proposed)?;
        let transition = workflow::maintenance_transition(&schedule, next)?;

        found(self.api.update_status(id, next).await, || not_found(id))?;
        tracing::info!(id, from = %transition.from, to = %transition.to, "Maintenance status changed");
        schedule.status = next;

        let mut warnings = Vec::new();
        if let Some(sync) = transition.sync {
            if let Err(e) = self
                .equipment
                .update_maintenance_date(sync.equipment_id, sync.maintenance_date)
                .await
            {
                tracing::warn!(
                    id,
                    equipment_id = sync.equipment_id,
                    error = %e,
                    "Equipment maintenance date sync failed"
                );
                warnings.push(format!(
                    "Status updated, but equipment {} maintenance date could not be updated: {}",
                    sync.equipment_id, e
                ));
            }
        }

        Ok(StatusChange { schedule, warnings })
    }

    /// Status, type and equipment filters, most recent date first
    pub async fn filter(&self, query: &MaintenanceFilterQuery) -> AppResult<Vec<MaintenanceSchedule>> {
        let criteria = FilterCriteria::new()
            .with(STATUS, FilterValue::parse(query.status.as_deref()))
            .with(TYPE, FilterValue::parse(query.maintenance_type.as_deref()))
            .with(EQUIPMENT_ID, FilterValue::parse(query.equipment_id.as_deref()));
        let baseline = if criteria.is_unconstrained() {
            self.api.list().await?
        } else {
            Vec::new()
        };

        let limit = self.filter_timeout;
        let fetchers = RemoteFetchers::new()
            .with(
                STATUS,
                fetcher(self.api.clone(), limit, |api, value| async move {
                    api.filter_by_status(&value).await
                }),
            )
            .with(
                TYPE,
                fetcher(self.api.clone(), limit, |api, value| async move {
                    api.filter_by_type(&value).await
                }),
            )
            .with(
                EQUIPMENT_ID,
                fetcher(self.api.clone(), limit, |api, value| async move {
                    api.filter_by_equipment(&value).await
                }),
            );

        let mut schedules = apply_filters(&baseline, &criteria, &fetchers)
            .await?
            .into_owned();
        sort_by_date_desc(&mut schedules);
        Ok(schedules)
    }

    /// Values for the filter panel
    pub async fn filter_options(&self) -> AppResult<MaintenanceFilterOptions> {
        let schedules = self.api.list().await?;

        let mut types: IndexSet<String> = schedules
            .iter()
            .map(|s| s.maintenance_type.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        types.extend(MAINTENANCE_TYPE_SUGGESTIONS.iter().map(|t| t.to_string()));

        let mut equipment_ids: Vec<i64> = schedules.iter().filter_map(|s| s.equipment_id).collect();
        equipment_ids.sort_unstable();
        equipment_ids.dedup();

        Ok(MaintenanceFilterOptions {
            statuses: MaintenanceStatus::ALL.to_vec(),
            maintenance_types: types.into_iter().collect(),
            equipment_ids,
        })
    }

    /// Calendar for the window centered on `center`
    pub async fn calendar(&self, center: YearMonth) -> AppResult<CalendarView> {
        let schedules = self.api.list().await?;
        let window = calendar::window(center);
        let index = DayIndex::build_window(&schedules, &window, |s| Some(s.maintenance_date));
        let months = window
            .iter()
            .map(|month| calendar::month_grid(*month, &index))
            .collect();
        Ok(CalendarView { window, months })
    }
}

fn not_found(id: i64) -> String {
    format!("Maintenance schedule {} not found", id)
}

fn check_cost(cost: Decimal) -> AppResult<()> {
    if cost < Decimal::ZERO {
        return Err(AppError::Validation("Cost must be a positive number".to_string()));
    }
    Ok(())
}

fn sort_by_date_desc(schedules: &mut [MaintenanceSchedule]) {
    schedules.sort_by(|a, b| b.maintenance_date.cmp(&a.maintenance_date));
}
