use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build a CORS layer from the `CORS_ORIGINS` env var.
///
/// - Origins: comma-separated list; `*` or unset allows any origin
///   (the frontend is served from changing preview domains)
/// - Methods: GET, POST, OPTIONS
/// - Headers: Authorization, Content-Type
pub fn build_cors_layer() -> CorsLayer {
    let origins_str = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
        ]);

    if origins_str.trim() == "*" {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins_str
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<HeaderValue>().ok()
        })
        .collect();

    base.allow_origin(origins)
        .max_age(std::time::Duration::from_secs(3600))
}
