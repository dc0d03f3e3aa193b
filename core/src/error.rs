use serde::Serialize;
use utoipa::ToSchema;

/// Structured error response shared by every endpoint.
/// Each error carries a machine-readable code plus enough context for
/// the frontend to show something actionable.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "rate_limited")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const CONFIGURATION_ERROR: &str = "configuration_error";
    pub const RATE_LIMITED: &str = "rate_limited";
    pub const UPSTREAM_AUTH_ERROR: &str = "upstream_auth_error";
    pub const UPSTREAM_ERROR: &str = "upstream_error";
    pub const DRIVE_NOT_CONFIGURED: &str = "drive_not_configured";
    pub const UPLOAD_FAILED: &str = "upload_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
