use std::path::Path;

use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod reviews;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
///
/// `frontend_dir`, when it exists on disk, is served for every path no API
/// route claims, with `index.html` as the fallback page.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/reviews", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/reviews/:id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let api = match frontend_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            let static_dir = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            api.fallback_service(static_dir)
        }
        None => api,
    };

    api.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
