//! Support ticket API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::StatusRequest;
use crate::{
    error::{AppError, AppResult},
    models::{
        ticket::{AssignTicket, CreateTicket, TicketCountQuery, TicketCounts, TicketFilterQuery},
        RaisedByType, Ticket,
    },
};

#[derive(Serialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

/// List tickets
#[utoipa::path(
    get,
    path = "/tickets",
    tag = "tickets",
    responses(
        (status = 200, description = "Ticket list", body = Vec<Ticket>)
    )
)]
pub async fn list_tickets(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = state.services.tickets.list().await?;
    Ok(Json(tickets))
}

/// Get a ticket
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    tag = "tickets",
    params(("id" = i64, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket details", body = Ticket),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_ticket(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.services.tickets.get(id).await?;
    Ok(Json(ticket))
}

/// Open a ticket
#[utoipa::path(
    post,
    path = "/tickets",
    tag = "tickets",
    request_body = CreateTicket,
    responses(
        (status = 201, description = "Ticket created"),
        (status = 400, description = "Invalid ticket", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_ticket(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateTicket>,
) -> AppResult<StatusCode> {
    state.services.tickets.create(&data).await?;
    Ok(StatusCode::CREATED)
}

/// Change a ticket's status
#[utoipa::path(
    put,
    path = "/tickets/{id}/status",
    tag = "tickets",
    params(("id" = i64, Path, description = "Ticket ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Ticket updated", body = Ticket),
        (status = 422, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_ticket_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<StatusRequest>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.services.tickets.change_status(id, &data.status).await?;
    Ok(Json(ticket))
}

/// Assign a ticket to a staff member
#[utoipa::path(
    put,
    path = "/tickets/{id}/assign",
    tag = "tickets",
    params(("id" = i64, Path, description = "Ticket ID")),
    request_body = AssignTicket,
    responses(
        (status = 200, description = "Ticket assigned", body = Ticket),
        (status = 422, description = "Ticket is closed", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_ticket(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<AssignTicket>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.services.tickets.assign(id, &data.staff_id).await?;
    Ok(Json(ticket))
}

/// Filter tickets by status and priority
#[utoipa::path(
    get,
    path = "/tickets/filter",
    tag = "tickets",
    params(TicketFilterQuery),
    responses(
        (status = 200, description = "Filtered tickets", body = Vec<Ticket>),
        (status = 502, description = "Backend filter failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn filter_tickets(
    State(state): State<crate::AppState>,
    Query(query): Query<TicketFilterQuery>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = state.services.tickets.filter(&query).await?;
    Ok(Json(tickets))
}

/// Ticket counts per status and priority
#[utoipa::path(
    get,
    path = "/tickets/counts",
    tag = "tickets",
    responses(
        (status = 200, description = "Ticket counts", body = TicketCounts)
    )
)]
pub async fn ticket_counts(State(state): State<crate::AppState>) -> AppResult<Json<TicketCounts>> {
    let counts = state.services.tickets.counts().await?;
    Ok(Json(counts))
}

/// Number of tickets in one status
#[utoipa::path(
    get,
    path = "/tickets/count-by-status",
    tag = "tickets",
    params(TicketCountQuery),
    responses(
        (status = 200, description = "Ticket count", body = CountResponse)
    )
)]
pub async fn count_by_status(
    State(state): State<crate::AppState>,
    Query(query): Query<TicketCountQuery>,
) -> AppResult<Json<CountResponse>> {
    let count = state.services.tickets.count_by_status(query.status).await?;
    Ok(Json(CountResponse { count }))
}

/// Number of open tickets, as last polled
#[utoipa::path(
    get,
    path = "/tickets/open-count",
    tag = "tickets",
    responses(
        (status = 200, description = "Open ticket count", body = CountResponse)
    )
)]
pub async fn open_count(State(state): State<crate::AppState>) -> AppResult<Json<CountResponse>> {
    let count = state.services.tickets.open_count().get().await?;
    Ok(Json(CountResponse { count }))
}

/// Tickets assigned to a staff member
#[utoipa::path(
    get,
    path = "/tickets/assigned-to/{staff_id}",
    tag = "tickets",
    params(("staff_id" = String, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Assigned tickets", body = Vec<Ticket>)
    )
)]
pub async fn assigned_to(
    State(state): State<crate::AppState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = state.services.tickets.assigned_to(&staff_id).await?;
    Ok(Json(tickets))
}

/// Tickets raised by a staff member or member
#[utoipa::path(
    get,
    path = "/tickets/raised-by/{raiser}/{raiser_id}",
    tag = "tickets",
    params(
        ("raiser" = String, Path, description = "`staff` or `member`"),
        ("raiser_id" = String, Path, description = "Staff or member ID")
    ),
    responses(
        (status = 200, description = "Raised tickets", body = Vec<Ticket>),
        (status = 400, description = "Unknown raiser type", body = crate::error::ErrorResponse)
    )
)]
pub async fn raised_by(
    State(state): State<crate::AppState>,
    Path((raiser, raiser_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<Ticket>>> {
    let raiser: RaisedByType = raiser
        .parse()
        .map_err(|e: crate::models::enums::UnknownVariant| AppError::BadRequest(e.to_string()))?;
    let tickets = state.services.tickets.raised_by(raiser, &raiser_id).await?;
    Ok(Json(tickets))
}
