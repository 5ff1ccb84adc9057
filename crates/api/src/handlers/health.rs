//! Service metadata and health endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;
use dog_breeds_common::{db::Repository, SERVICE_NAME, VERSION};

/// Service metadata returned from the root endpoint
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointDirectory,
}

/// Directory of the query endpoints
#[derive(Debug, Serialize)]
pub struct EndpointDirectory {
    pub health: &'static str,
    pub breeds: &'static str,
    pub recent_breeds: &'static str,
    pub stats: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

/// Root endpoint with service metadata
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME,
        version: VERSION,
        endpoints: EndpointDirectory {
            health: "/health",
            breeds: "/api/breeds",
            recent_breeds: "/api/breeds/recent",
            stats: "/api/breeds/stats",
        },
    })
}

/// Health check endpoint
///
/// Always answers 200. A broken database connection is reported in the
/// body so orchestrators keep routing while operators see the problem.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let repo = Repository::new(state.db.clone());

    let (status, database) = match repo.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            ("unhealthy", "disconnected")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
