//! Axum router construction.
//!
//! Builds the application router with the JSON endpoints, static serving of
//! uploaded files, and the shared middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::upload::upload_images,
        routes::images::get_images,
        routes::delete::delete_image,
        routes::delete::delete_all_images,
    ),
    components(schemas(
        routes::upload::UploadRequest,
        routes::upload::UploadResponse,
        routes::images::EmployeeImagesResponse,
        routes::images::ImageEntryResponse,
        routes::MessageResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(ctx.config.storage.max_upload_bytes);
    let uploads = ServeDir::new(&ctx.config.storage.upload_dir);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route(
            "/upload",
            post(routes::upload::upload_images).layer(upload_limit),
        )
        .route("/images/{employeeId}", get(routes::images::get_images))
        .route(
            "/delete/{employeeId}",
            delete(routes::delete::delete_all_images),
        )
        .route(
            "/delete/{employeeId}/{filename}",
            delete(routes::delete::delete_image),
        )
        .nest_service("/uploads", uploads)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
