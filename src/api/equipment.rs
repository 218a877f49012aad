//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::equipment::{CreateEquipment, Equipment, UpdateEquipmentMaintenanceDate, UpdateEquipmentStatus},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct EquipmentSearchQuery {
    /// Free text matched by the backend
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EquipmentFilterQuery {
    /// Status name or ALL
    pub status: Option<String>,
}

/// List active equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// List all equipment, soft-deleted records included
#[utoipa::path(
    get,
    path = "/equipment/all",
    tag = "equipment",
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_all_equipment(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list_with_deleted().await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get(id).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create(&data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update equipment status
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = UpdateEquipmentStatus,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment)
    )
)]
pub async fn update_equipment_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateEquipmentStatus>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.update_status(id, data.status).await?;
    Ok(Json(equipment))
}

/// Update equipment last maintenance date
#[utoipa::path(
    put,
    path = "/equipment/{id}/maintenance-date",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = UpdateEquipmentMaintenanceDate,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment)
    )
)]
pub async fn update_equipment_maintenance_date(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateEquipmentMaintenanceDate>,
) -> AppResult<Json<Equipment>> {
    let equipment = state
        .services
        .equipment
        .update_maintenance_date(id, data.maintenance_date)
        .await?;
    Ok(Json(equipment))
}

/// Search equipment
#[utoipa::path(
    get,
    path = "/equipment/search",
    tag = "equipment",
    params(EquipmentSearchQuery),
    responses(
        (status = 200, description = "Matching equipment", body = Vec<Equipment>)
    )
)]
pub async fn search_equipment(
    State(state): State<crate::AppState>,
    Query(query): Query<EquipmentSearchQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state
        .services
        .equipment
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(equipment))
}

/// Filter equipment by status
#[utoipa::path(
    get,
    path = "/equipment/filter",
    tag = "equipment",
    params(EquipmentFilterQuery),
    responses(
        (status = 200, description = "Filtered equipment", body = Vec<Equipment>),
        (status = 502, description = "Backend filter failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn filter_equipment(
    State(state): State<crate::AppState>,
    Query(query): Query<EquipmentFilterQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.filter(query.status.as_deref()).await?;
    Ok(Json(equipment))
}
