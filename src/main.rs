//! GymOps Server - gym maintenance and ticket dashboard API
//!
//! A Rust REST API server in front of the gym backend.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymops_server::{api, config::AppConfig, remote::RemoteClient, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gymops_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting GymOps Server v{}", env!("CARGO_PKG_VERSION"));

    // Backend client
    let client = RemoteClient::new(&config.remote)?;
    tracing::info!("Using gym backend at {}", client.base_url());

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    let services = Services::new(client, &config.dashboard);

    // Open ticket counter refresh
    let poller = match config.dashboard.ticket_poll_seconds {
        0 => None,
        seconds => Some(
            services
                .tickets
                .open_count()
                .spawn_poller(Duration::from_secs(seconds)),
        ),
    };

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse()?, server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(poller) = poller {
        poller.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Equipment
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/all", get(api::equipment::list_all_equipment))
        .route("/equipment/search", get(api::equipment::search_equipment))
        .route("/equipment/filter", get(api::equipment::filter_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id", delete(api::equipment::delete_equipment))
        .route("/equipment/:id/status", put(api::equipment::update_equipment_status))
        .route(
            "/equipment/:id/maintenance-date",
            put(api::equipment::update_equipment_maintenance_date),
        )
        // Maintenance schedules
        .route("/maintenance", get(api::maintenance::list_schedules))
        .route("/maintenance", post(api::maintenance::create_schedule))
        .route("/maintenance/filter", get(api::maintenance::filter_schedules))
        .route("/maintenance/filter-options", get(api::maintenance::filter_options))
        .route("/maintenance/calendar", get(api::maintenance::calendar))
        .route("/maintenance/:id", get(api::maintenance::get_schedule))
        .route("/maintenance/:id", delete(api::maintenance::delete_schedule))
        .route("/maintenance/:id/date", put(api::maintenance::update_schedule_date))
        .route("/maintenance/:id/status", put(api::maintenance::update_schedule_status))
        .route("/maintenance/:id/cost", put(api::maintenance::update_schedule_cost))
        .route("/maintenance/:id/technician", put(api::maintenance::update_schedule_technician))
        .route("/maintenance/:id/description", put(api::maintenance::update_schedule_description))
        // Tickets
        .route("/tickets", get(api::tickets::list_tickets))
        .route("/tickets", post(api::tickets::create_ticket))
        .route("/tickets/filter", get(api::tickets::filter_tickets))
        .route("/tickets/counts", get(api::tickets::ticket_counts))
        .route("/tickets/count-by-status", get(api::tickets::count_by_status))
        .route("/tickets/open-count", get(api::tickets::open_count))
        .route("/tickets/assigned-to/:staff_id", get(api::tickets::assigned_to))
        .route("/tickets/raised-by/:raiser/:raiser_id", get(api::tickets::raised_by))
        .route("/tickets/:id", get(api::tickets::get_ticket))
        .route("/tickets/:id/status", put(api::tickets::update_ticket_status))
        .route("/tickets/:id/assign", put(api::tickets::assign_ticket))
        // Monthly costs
        .route("/costs", get(api::costs::list_costs))
        .route("/costs/report", get(api::costs::cost_report))
        .route("/costs/recompute", post(api::costs::recompute_costs))
        .route("/costs/month/:month", get(api::costs::costs_by_month))
        .route("/costs/year/:year", get(api::costs::costs_by_year))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
