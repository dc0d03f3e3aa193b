use std::net::SocketAddr;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod drive;
mod error;
mod middleware;
mod openai;
mod prompt;
mod routes;
mod state;

/// Uploads match the legacy 10 MB limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Eduplan API",
        version = "0.2.0",
        description = "Backend for MEDUCA-aligned lesson plan generation and Google Drive export."
    ),
    paths(
        routes::health::service_info,
        routes::health::test_endpoint,
        routes::health::health_check,
        routes::plan::generate_plan,
        routes::drive::export_to_drive,
        routes::drive::upload_to_drive,
        routes::drive::drive_status,
    ),
    components(schemas(
        eduplan_core::error::ApiError,
        eduplan_core::plan::GeneratePlanRequest,
        eduplan_core::plan::Trimester,
        routes::health::ServiceInfoResponse,
        routes::health::TestResponse,
        routes::health::HealthResponse,
        routes::drive::UploadResponse,
        routes::drive::LegacyUploadRequest,
        routes::drive::DriveStatusResponse,
        drive::DriveFile,
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eduplan_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = config::AppConfig::from_env();
    if config.openai.is_none() {
        tracing::warn!("OPENAI_API_KEY not set — /api/generate-plan will answer 500");
    }
    if config.drive.is_none() {
        tracing::warn!("Google Drive credentials not set — upload endpoints will answer 503");
    }

    let port = config.port;
    let app_state = state::AppState::new(config);

    let cors_layer = middleware::cors::build_cors_layer();

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::plan::router().layer(middleware::rate_limit::plan_layer()))
        .merge(
            routes::drive::router()
                .layer(middleware::rate_limit::upload_layer())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback(routes::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Eduplan API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
