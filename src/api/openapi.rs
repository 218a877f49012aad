//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{costs, equipment, health, maintenance, tickets};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GymOps API",
        version = "1.0.0",
        description = "Gym equipment maintenance, ticket and cost reporting API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::list_equipment,
        equipment::list_all_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::delete_equipment,
        equipment::update_equipment_status,
        equipment::update_equipment_maintenance_date,
        equipment::search_equipment,
        equipment::filter_equipment,
        // Maintenance
        maintenance::list_schedules,
        maintenance::get_schedule,
        maintenance::create_schedule,
        maintenance::delete_schedule,
        maintenance::update_schedule_date,
        maintenance::update_schedule_status,
        maintenance::update_schedule_cost,
        maintenance::update_schedule_technician,
        maintenance::update_schedule_description,
        maintenance::filter_schedules,
        maintenance::filter_options,
        maintenance::calendar,
        // Tickets
        tickets::list_tickets,
        tickets::get_ticket,
        tickets::create_ticket,
        tickets::update_ticket_status,
        tickets::assign_ticket,
        tickets::filter_tickets,
        tickets::ticket_counts,
        tickets::count_by_status,
        tickets::open_count,
        tickets::assigned_to,
        tickets::raised_by,
        // Costs
        costs::recompute_costs,
        costs::list_costs,
        costs::costs_by_month,
        costs::costs_by_year,
        costs::cost_report,
    ),
    components(
        schemas(
            // Shared
            crate::api::StatusRequest,
            crate::models::EquipmentStatus,
            crate::models::MaintenanceStatus,
            crate::models::TicketStatus,
            crate::models::TicketPriority,
            crate::models::RaisedByType,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipmentStatus,
            crate::models::equipment::UpdateEquipmentMaintenanceDate,
            // Maintenance
            crate::models::maintenance::MaintenanceSchedule,
            crate::models::maintenance::CreateMaintenanceSchedule,
            crate::models::maintenance::UpdateMaintenanceDate,
            crate::models::maintenance::UpdateMaintenanceCost,
            crate::models::maintenance::UpdateTechnician,
            crate::models::maintenance::UpdateMaintenanceDescription,
            crate::models::maintenance::MaintenanceFilterOptions,
            crate::services::maintenance::StatusChange,
            crate::services::maintenance::CalendarView,
            crate::lifecycle::calendar::MonthGrid,
            crate::lifecycle::calendar::CalendarDay,
            crate::lifecycle::calendar::DayEvent,
            crate::lifecycle::calendar::DayClass,
            // Tickets
            crate::models::ticket::Ticket,
            crate::models::ticket::CreateTicket,
            crate::models::ticket::AssignTicket,
            crate::models::ticket::TicketCounts,
            tickets::CountResponse,
            // Costs
            crate::models::monthly_cost::MonthlyCost,
            crate::services::costs::CostReport,
            crate::lifecycle::costs::YearSummary,
            crate::lifecycle::costs::MonthShare,
            crate::lifecycle::costs::CostPoint,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Gym equipment"),
        (name = "maintenance", description = "Maintenance schedules and calendar"),
        (name = "tickets", description = "Support tickets"),
        (name = "costs", description = "Monthly maintenance costs")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/maintenance/{id}/status"));
        assert!(paths.contains_key("/maintenance/calendar"));
        assert!(paths.contains_key("/tickets/open-count"));
        assert!(paths.contains_key("/costs/report"));
    }
}
