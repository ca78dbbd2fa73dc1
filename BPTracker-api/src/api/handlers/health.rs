use std::collections::HashMap;
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use bp_tracker_domain::health::{ComponentStatus, SystemHealth, SystemStatus};

use crate::api::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, `degraded` or `error`
    pub status: String,
    /// Application version from the Cargo manifest
    pub version: String,
    /// Unix timestamp of the response
    pub timestamp: u64,
    /// Seconds since the server started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Component name to its status
    pub components: HashMap<String, ComponentHealthStatus>,
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// `ok`, `degraded` or `error`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the start time reported as uptime. Later calls are ignored.
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let _ = SERVER_START_TIME.set(unix_now());
    });
}

fn system_label(status: SystemStatus) -> &'static str {
    match status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    }
}

fn component_label(status: ComponentStatus) -> &'static str {
    match status {
        ComponentStatus::Healthy => "ok",
        ComponentStatus::Degraded => "degraded",
        ComponentStatus::Unhealthy => "error",
    }
}

fn to_response(health: SystemHealth, now: u64) -> HealthResponse {
    let mut components: HashMap<String, ComponentHealthStatus> = health
        .components
        .into_iter()
        .map(|(name, component)| {
            (
                name,
                ComponentHealthStatus {
                    status: component_label(component.status).to_string(),
                    message: component.details,
                },
            )
        })
        .collect();
    components.insert(
        "api".to_string(),
        ComponentHealthStatus {
            status: "ok".to_string(),
            message: None,
        },
    );

    HealthResponse {
        status: system_label(health.status).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime: SERVER_START_TIME.get().map(|&start| now.saturating_sub(start)),
        components,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Healthy or degraded", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    let health = state.health.get_system_health().await;
    let status = health.status;
    let response = to_response(health, unix_now());

    match status {
        SystemStatus::Healthy | SystemStatus::Degraded => (StatusCode::OK, Json(response)),
        SystemStatus::Unhealthy => {
            warn!("Health check failed: {:?}", response.components.get("database"));
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_domain::health::HealthComponent;

    fn health(status: SystemStatus, component: ComponentStatus) -> SystemHealth {
        SystemHealth {
            status,
            components: [(
                "database".to_string(),
                HealthComponent {
                    status: component,
                    details: Some("sqlite".to_string()),
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_response_maps_statuses() {
        initialize_server_start_time();
        let now = unix_now();

        let response = to_response(health(SystemStatus::Degraded, ComponentStatus::Degraded), now);
        assert_eq!(response.status, "degraded");
        assert_eq!(response.components["database"].status, "degraded");
        assert_eq!(response.components["database"].message.as_deref(), Some("sqlite"));
        assert_eq!(response.components["api"].status, "ok");
        assert!(response.uptime.is_some());

        let response = to_response(health(SystemStatus::Unhealthy, ComponentStatus::Unhealthy), now);
        assert_eq!(response.status, "error");
    }
}
