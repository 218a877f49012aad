//! Monthly maintenance cost API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{monthly_cost::CostFilterQuery, MonthlyCost},
    services::costs::CostReport,
};

/// Recompute monthly costs on the backend
#[utoipa::path(
    post,
    path = "/costs/recompute",
    tag = "costs",
    responses(
        (status = 204, description = "Recompute done")
    )
)]
pub async fn recompute_costs(State(state): State<crate::AppState>) -> AppResult<StatusCode> {
    state.services.costs.recompute().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Monthly costs, most recent first, optionally restricted to a year or month
#[utoipa::path(
    get,
    path = "/costs",
    tag = "costs",
    params(CostFilterQuery),
    responses(
        (status = 200, description = "Monthly costs", body = Vec<MonthlyCost>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_costs(
    State(state): State<crate::AppState>,
    Query(query): Query<CostFilterQuery>,
) -> AppResult<Json<Vec<MonthlyCost>>> {
    let rows = state.services.costs.query(query.filter.as_deref()).await?;
    Ok(Json(rows))
}

/// Cost for one month
#[utoipa::path(
    get,
    path = "/costs/month/{month}",
    tag = "costs",
    params(("month" = String, Path, description = "Month as YYYY-MM")),
    responses(
        (status = 200, description = "Monthly costs", body = Vec<MonthlyCost>)
    )
)]
pub async fn costs_by_month(
    State(state): State<crate::AppState>,
    Path(month): Path<String>,
) -> AppResult<Json<Vec<MonthlyCost>>> {
    let rows = state.services.costs.by_month(&month).await?;
    Ok(Json(rows))
}

/// Costs for one year
#[utoipa::path(
    get,
    path = "/costs/year/{year}",
    tag = "costs",
    params(("year" = String, Path, description = "Year as YYYY")),
    responses(
        (status = 200, description = "Monthly costs", body = Vec<MonthlyCost>)
    )
)]
pub async fn costs_by_year(
    State(state): State<crate::AppState>,
    Path(year): Path<String>,
) -> AppResult<Json<Vec<MonthlyCost>>> {
    let rows = state.services.costs.by_year(&year).await?;
    Ok(Json(rows))
}

/// Yearly cost statistics
#[utoipa::path(
    get,
    path = "/costs/report",
    tag = "costs",
    params(CostFilterQuery),
    responses(
        (status = 200, description = "Cost report", body = CostReport),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn cost_report(
    State(state): State<crate::AppState>,
    Query(query): Query<CostFilterQuery>,
) -> AppResult<Json<CostReport>> {
    let report = state.services.costs.report(query.filter.as_deref()).await?;
    Ok(Json(report))
}
