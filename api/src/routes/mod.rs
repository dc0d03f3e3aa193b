use axum::Json;
use axum::http::StatusCode;

use eduplan_core::error::{self, ApiError};

pub mod drive;
pub mod health;
pub mod plan;

/// Router fallback: 404 with the list of available endpoints.
pub async fn not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: error::codes::NOT_FOUND.to_string(),
            message: "Endpoint no encontrado".to_string(),
            field: None,
            received: None,
            request_id: uuid::Uuid::now_v7().to_string(),
            docs_hint: Some(
                "Endpoints disponibles: GET /, GET /api/test, GET /api/health, \
                 GET /api/drive-status, POST /api/generate-plan, \
                 POST /api/upload-to-drive, POST /api/export-to-drive"
                    .to_string(),
            ),
        }),
    )
}
