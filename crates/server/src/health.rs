use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Service name reported by the health endpoint.
const SERVICE_NAME: &str = "openai-proxy";

/// Health endpoint payload.
#[derive(Debug, Serialize)]
pub(crate) struct HealthState {
    status: &'static str,
    service: &'static str,
    time: String,
}

/// Handles health check requests and returns the current health status of the server.
pub(crate) async fn health() -> (StatusCode, Json<HealthState>) {
    (
        StatusCode::OK,
        Json(HealthState {
            status: "healthy",
            service: SERVICE_NAME,
            time: jiff::Timestamp::now().to_string(),
        }),
    )
}
