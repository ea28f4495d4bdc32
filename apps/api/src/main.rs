use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::services::{
    AppointmentStore, InMemoryAppointmentStore, SchedulingService, SupabaseAppointmentStore,
    SystemClock,
};
use doctor_cell::services::AvailabilityService;
use notification_cell::services::channel_from_config;
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduling API server");

    // Load configuration
    let config = AppConfig::from_env();
    info!(
        "Clinic timezone {}, lead time {} min, {} tenant policies (default {})",
        config.clinic_timezone,
        config.lead_time_minutes,
        config.tenant_policies.len(),
        config.tenant_policies.default_policy()
    );

    let store: Arc<dyn AppointmentStore> = if config.is_configured() {
        Arc::new(SupabaseAppointmentStore::new(&config))
    } else {
        warn!("Supabase not configured, appointments are kept in memory");
        Arc::new(InMemoryAppointmentStore::new(config.clinic_timezone))
    };

    // Create shared state
    let availability = Arc::new(AvailabilityService::new(&config));
    let scheduling = Arc::new(SchedulingService::new(
        &config,
        availability.clone(),
        store,
        channel_from_config(&config),
        Arc::new(SystemClock),
    ));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(availability, scheduling)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
