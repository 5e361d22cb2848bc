//! Health and metrics endpoints.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use workforce_core::HealthStatus;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `UP`, `DEGRADED` or `DOWN`.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Status of one dependency.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub components: Vec<ComponentHealth>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

/// Probes every registered dependency concurrently.
async fn probe(state: &AppState) -> (HealthStatus, Vec<ComponentHealth>) {
    let results = join_all(state.health_checks.iter().map(|check| async move {
        let status = check.check().await;
        (check.name().to_string(), status)
    }))
    .await;

    let overall = if results.iter().any(|(_, s)| s.is_unhealthy()) {
        HealthStatus::Unhealthy("one or more components are down".to_string())
    } else if results.iter().all(|(_, s)| s.is_healthy()) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded("one or more components are degraded".to_string())
    };

    let components = results
        .into_iter()
        .map(|(name, status)| ComponentHealth {
            name,
            status: status.label().to_string(),
            message: match status {
                HealthStatus::Healthy => None,
                HealthStatus::Degraded(m) | HealthStatus::Unhealthy(m) => Some(m),
            },
        })
        .collect();

    (overall, components)
}

/// Overall service health.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "A dependency is down", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (overall, _) = probe(&state).await;
    let code = if overall.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (
        code,
        Json(HealthResponse {
            status: overall.label().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness: every dependency answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let (overall, components) = probe(&state).await;
    let code = if overall.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (
        code,
        Json(ReadinessResponse {
            status: overall.label().to_string(),
            components,
        }),
    )
}

/// Liveness: the process is serving requests.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Prometheus exposition of the recorded metrics.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
