//! Dog Breeds query API
//!
//! Read-only HTTP surface over the dog_breeds table:
//! - Paginated list, recent, and name search reads
//! - Aggregate stats per job definition
//! - Health and service metadata
//! - Observability (structured logging, metrics, request IDs)

mod handlers;

use axum::{http::HeaderValue, routing::get, Router};
use dog_breeds_common::{
    config::{AppConfig, ObservabilityConfig, ServerConfig},
    db::{self, DatabaseConnection},
    metrics,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting Dog Breeds API v{}", dog_breeds_common::VERSION);
    info!(
        origins = %config.server.allowed_origins,
        "CORS configuration loaded"
    );

    // Initialize metrics exporter when a port is configured
    if config.observability.metrics_port > 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                metrics::LATENCY_BUCKETS,
            )?
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }
    metrics::register_metrics();

    // Initialize database connection
    let db = db::connect(&config.database).await?;

    let config = Arc::new(config);

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr: SocketAddr = config.server.bind_addr().parse()?;
    info!("Dog Breeds API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.server);

    Router::new()
        // Service metadata and health
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        // Breed queries
        .route("/api/breeds", get(handlers::breeds::list_breeds))
        .route("/api/breeds/recent", get(handlers::breeds::recent_breeds))
        .route("/api/breeds/stats", get(handlers::breeds::breed_stats))
        .route(
            "/api/breeds/search/{breed_name}",
            get(handlers::breeds::search_breeds),
        )
        .route("/api/breeds/{breed_id}", get(handlers::breeds::get_breed))
        // Middleware: request ids are minted outermost so the trace
        // and response layers both see them
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// CORS layer built from the configured origin list
fn build_cors(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .origin_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Initialize the tracing subscriber from observability settings
fn init_tracing(obs: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&obs.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if obs.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
