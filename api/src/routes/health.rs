use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Feature labels reported by the introspection endpoints.
pub const FEATURES: [&str; 2] = ["openai-plans", "google-drive-export"];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/api/test", get(test_endpoint))
        .route("/api/health", get(health_check))
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub features: Vec<&'static str>,
}

#[derive(Serialize, ToSchema)]
pub struct TestResponse {
    pub message: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    pub features: Vec<&'static str>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub openai_configured: bool,
    pub google_drive_configured: bool,
    pub features: Vec<&'static str>,
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = ServiceInfoResponse)),
    tag = "system"
)]
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: "Eduplan backend funcionando".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        features: FEATURES.to_vec(),
    })
}

/// Test endpoint
#[utoipa::path(
    get,
    path = "/api/test",
    responses((status = 200, description = "Backend responds", body = TestResponse)),
    tag = "system"
)]
pub async fn test_endpoint(State(state): State<AppState>) -> Json<TestResponse> {
    Json(TestResponse {
        message: "Backend funcionando correctamente".to_string(),
        environment: state.config.environment.clone(),
        timestamp: Utc::now(),
        features: FEATURES.to_vec(),
    })
}

/// Health check endpoint — reports which upstream credentials are configured
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "Eduplan Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        environment: state.config.environment.clone(),
        openai_configured: state.config.openai.is_some(),
        google_drive_configured: state.config.drive.is_some(),
        features: FEATURES.to_vec(),
    })
}
