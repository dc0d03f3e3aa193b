use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eduplan_core::error::{self, ApiError};

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Client input error (400)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
    /// Missing server-side secret (500)
    Configuration { message: String },
    /// Completion API answered 429 — surfaced as 429 with a retry-later message
    UpstreamRateLimited,
    /// Completion API rejected our credential — a server misconfiguration (500)
    UpstreamAuth,
    /// Any other non-2xx from the completion API (500)
    Upstream { status: u16, detail: String },
    /// Could not reach the completion API at all (503)
    UpstreamUnavailable { detail: String },
    /// Drive credentials absent (503)
    DriveNotConfigured,
    /// Drive upload failed (500)
    Upload { message: String },
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::Configuration { message } => {
                tracing::error!("Configuration error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::CONFIGURATION_ERROR.to_string(),
                        message: "Configuración del servidor incompleta. Contacta al administrador."
                            .to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::UpstreamRateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiError {
                    error: error::codes::RATE_LIMITED.to_string(),
                    message: "Hemos alcanzado el límite temporal de solicitudes al servicio de IA. \
                              Intenta de nuevo en 1-2 minutos."
                        .to_string(),
                    field: None,
                    received: None,
                    request_id,
                    docs_hint: None,
                },
            ),
            AppError::UpstreamAuth => {
                tracing::error!("Completion API rejected the configured credential");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::UPSTREAM_AUTH_ERROR.to_string(),
                        message: "Error de configuración del servicio. Contacta al administrador."
                            .to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::Upstream { status, detail } => {
                tracing::error!(status = %status, detail = %detail, "Completion API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::UPSTREAM_ERROR.to_string(),
                        message:
                            "Error temporal del servicio de IA. Intenta nuevamente en unos minutos."
                                .to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::UpstreamUnavailable { detail } => {
                tracing::error!(detail = %detail, "Completion API unreachable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError {
                        error: error::codes::UPSTREAM_ERROR.to_string(),
                        message: "Error de conexión con el servicio. Verifica tu internet e intenta nuevamente."
                            .to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::DriveNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError {
                    error: error::codes::DRIVE_NOT_CONFIGURED.to_string(),
                    message: "Google Drive no está configurado en el servidor".to_string(),
                    field: None,
                    received: None,
                    request_id,
                    docs_hint: Some(
                        "Configura GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET y GOOGLE_REFRESH_TOKEN, \
                         o GOOGLE_SERVICE_ACCOUNT_EMAIL y GOOGLE_PRIVATE_KEY."
                            .to_string(),
                    ),
                },
            ),
            AppError::Upload { message } => {
                tracing::error!("Drive upload failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::UPLOAD_FAILED.to_string(),
                        message: format!("Error al subir archivo a Google Drive: {message}"),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::INTERNAL_ERROR.to_string(),
                        message: "Error interno del servidor".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn upstream_rate_limit_surfaces_as_429() {
        assert_eq!(
            status_of(AppError::UpstreamRateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn upstream_auth_surfaces_as_500() {
        assert_eq!(
            status_of(AppError::UpstreamAuth),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_drive_credentials_surface_as_503() {
        assert_eq!(
            status_of(AppError::DriveNotConfigured),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn generic_upstream_error_surfaces_as_500() {
        let error = AppError::Upstream {
            status: 502,
            detail: "bad gateway".to_string(),
        };
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_surfaces_as_400() {
        let error = AppError::Validation {
            message: "campo requerido".to_string(),
            field: Some("materia".to_string()),
            received: None,
            docs_hint: None,
        };
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }
}
