//! Maintenance schedule API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use utoipa::IntoParams;

use super::StatusRequest;
use crate::{
    error::{AppError, AppResult},
    lifecycle::calendar::YearMonth,
    models::maintenance::{
        CreateMaintenanceSchedule, MaintenanceFilterOptions, MaintenanceFilterQuery, MaintenanceSchedule,
        UpdateMaintenanceCost, UpdateMaintenanceDate, UpdateMaintenanceDescription, UpdateTechnician,
    },
    services::maintenance::{CalendarView, StatusChange},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// Center month as `YYYY-MM`; defaults to the current month
    pub month: Option<String>,
}

/// List maintenance schedules, most recent first
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    responses(
        (status = 200, description = "Schedule list", body = Vec<MaintenanceSchedule>)
    )
)]
pub async fn list_schedules(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<MaintenanceSchedule>>> {
    let schedules = state.services.maintenance.list().await?;
    Ok(Json(schedules))
}

/// Get a maintenance schedule
#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule details", body = MaintenanceSchedule),
        (status = 404, description = "Schedule not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_schedule(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MaintenanceSchedule>> {
    let schedule = state.services.maintenance.get(id).await?;
    Ok(Json(schedule))
}

/// Create a maintenance schedule
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    request_body = CreateMaintenanceSchedule,
    responses(
        (status = 201, description = "Schedule created", body = MaintenanceSchedule),
        (status = 400, description = "Invalid schedule", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_schedule(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateMaintenanceSchedule>,
) -> AppResult<(StatusCode, Json<MaintenanceSchedule>)> {
    let schedule = state.services.maintenance.create(&data).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Delete a maintenance schedule
#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted")
    )
)]
pub async fn delete_schedule(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.maintenance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the maintenance date
#[utoipa::path(
    put,
    path = "/maintenance/{id}/date",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = UpdateMaintenanceDate,
    responses(
        (status = 200, description = "Schedule updated", body = MaintenanceSchedule)
    )
)]
pub async fn update_schedule_date(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateMaintenanceDate>,
) -> AppResult<Json<MaintenanceSchedule>> {
    let schedule = state
        .services
        .maintenance
        .update_date(id, data.maintenance_date)
        .await?;
    Ok(Json(schedule))
}

/// Change the maintenance status
#[utoipa::path(
    put,
    path = "/maintenance/{id}/status",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed; warnings list failed follow-up writes", body = StatusChange),
        (status = 422, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_schedule_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<StatusRequest>,
) -> AppResult<Json<StatusChange>> {
    let change = state.services.maintenance.change_status(id, &data.status).await?;
    Ok(Json(change))
}

/// Change the maintenance cost
#[utoipa::path(
    put,
    path = "/maintenance/{id}/cost",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = UpdateMaintenanceCost,
    responses(
        (status = 200, description = "Schedule updated", body = MaintenanceSchedule),
        (status = 400, description = "Negative cost", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_schedule_cost(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateMaintenanceCost>,
) -> AppResult<Json<MaintenanceSchedule>> {
    let schedule = state
        .services
        .maintenance
        .update_cost(id, data.maintenance_cost)
        .await?;
    Ok(Json(schedule))
}

/// Change the technician
#[utoipa::path(
    put,
    path = "/maintenance/{id}/technician",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = UpdateTechnician,
    responses(
        (status = 200, description = "Schedule updated", body = MaintenanceSchedule)
    )
)]
pub async fn update_schedule_technician(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateTechnician>,
) -> AppResult<Json<MaintenanceSchedule>> {
    let schedule = state
        .services
        .maintenance
        .update_technician(id, &data.technician)
        .await?;
    Ok(Json(schedule))
}

/// Change the description
#[utoipa::path(
    put,
    path = "/maintenance/{id}/description",
    tag = "maintenance",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = UpdateMaintenanceDescription,
    responses(
        (status = 200, description = "Schedule updated", body = MaintenanceSchedule)
    )
)]
pub async fn update_schedule_description(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateMaintenanceDescription>,
) -> AppResult<Json<MaintenanceSchedule>> {
    let schedule = state
        .services
        .maintenance
        .update_description(id, &data.maintenance_description)
        .await?;
    Ok(Json(schedule))
}

/// Filter schedules by status, type and equipment
#[utoipa::path(
    get,
    path = "/maintenance/filter",
    tag = "maintenance",
    params(MaintenanceFilterQuery),
    responses(
        (status = 200, description = "Filtered schedules, most recent first", body = Vec<MaintenanceSchedule>),
        (status = 502, description = "Backend filter failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn filter_schedules(
    State(state): State<crate::AppState>,
    Query(query): Query<MaintenanceFilterQuery>,
) -> AppResult<Json<Vec<MaintenanceSchedule>>> {
    let schedules = state.services.maintenance.filter(&query).await?;
    Ok(Json(schedules))
}

/// Values available to the filter panel
#[utoipa::path(
    get,
    path = "/maintenance/filter-options",
    tag = "maintenance",
    responses(
        (status = 200, description = "Filter options", body = MaintenanceFilterOptions)
    )
)]
pub async fn filter_options(
    State(state): State<crate::AppState>,
) -> AppResult<Json<MaintenanceFilterOptions>> {
    let options = state.services.maintenance.filter_options().await?;
    Ok(Json(options))
}

/// Three-month maintenance calendar
#[utoipa::path(
    get,
    path = "/maintenance/calendar",
    tag = "maintenance",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar window", body = CalendarView),
        (status = 400, description = "Invalid month", body = crate::error::ErrorResponse)
    )
)]
pub async fn calendar(
    State(state): State<crate::AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarView>> {
    let center = match query.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => month
            .parse::<YearMonth>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
        None => YearMonth::of(Local::now().date_naive()),
    };
    let view = state.services.maintenance.calendar(center).await?;
    Ok(Json(view))
}
