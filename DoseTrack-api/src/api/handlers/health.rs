use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use dose_track_domain::health::{HealthServiceTrait, SystemStatus};

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,

    /// Current application version from the Cargo manifest
    pub version: String,

    /// Timestamp of when the response was generated
    pub timestamp: u64,

    /// Status of individual system components
    pub components: Vec<ComponentHealthStatus>,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Component name (e.g. "database")
    pub name: String,

    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,

    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared health service handle injected by the router
pub type HealthServiceHandle = Arc<dyn HealthServiceTrait>;

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<HealthServiceHandle>,
) -> impl IntoResponse {
    info!("Health check requested");

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let system_health = health_service.get_system_health().await;

    let status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let components = system_health
        .components
        .into_iter()
        .map(|(name, component)| ComponentHealthStatus {
            name,
            status: match component.status {
                dose_track_domain::health::ComponentStatus::Healthy => "ok".to_string(),
                dose_track_domain::health::ComponentStatus::Degraded => "degraded".to_string(),
                dose_track_domain::health::ComponentStatus::Unhealthy => "error".to_string(),
            },
            message: component.details,
        })
        .collect();

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        components,
    };

    let code = match system_health.status {
        SystemStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (code, Json(response))
}
