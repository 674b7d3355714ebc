use axum::{extract::{Path, State}, http::StatusCode, Json};
use models::review::{Review, ReviewId};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::extract::ReviewPayload;
use crate::state::ServerState;

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub success: bool,
    pub deleted: Review,
}

/// Unparseable ids cannot name a stored review, so they are a 404 like any
/// other unknown id.
fn parse_id(raw: &str) -> Result<ReviewId, JsonApiError> {
    ReviewId::parse(raw).ok_or_else(|| {
        warn!(id = %raw, "malformed review id");
        JsonApiError::not_found()
    })
}

#[utoipa::path(
    get, path = "/reviews", tag = "reviews",
    responses((status = 200, description = "All reviews in insertion order", body = [crate::openapi::ReviewDoc]))
)]
pub async fn list_reviews(State(state): State<ServerState>) -> Json<Vec<Review>> {
    let list = state.reviews.list().await;
    info!(count = list.len(), "list reviews");
    Json(list)
}

#[utoipa::path(
    get, path = "/reviews/{id}", tag = "reviews",
    params(("id" = String, Path, description = "Sequential number or UUID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ReviewDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, JsonApiError> {
    let id = parse_id(&id)?;
    state.reviews.get(id).await.map(Json).ok_or_else(JsonApiError::not_found)
}

#[utoipa::path(
    post, path = "/reviews", tag = "reviews",
    request_body(content = crate::openapi::ReviewInputDoc, content_type = "application/json"),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ReviewDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_review(
    State(state): State<ServerState>,
    ReviewPayload(input): ReviewPayload,
) -> Result<(StatusCode, Json<Review>), JsonApiError> {
    let created = state.reviews.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/reviews/{id}", tag = "reviews",
    params(("id" = String, Path, description = "Sequential number or UUID")),
    request_body(content = crate::openapi::ReviewInputDoc, content_type = "application/json"),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ReviewDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ReviewPayload(input): ReviewPayload,
) -> Result<Json<Review>, JsonApiError> {
    let id = parse_id(&id)?;
    let updated = state.reviews.update(id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/reviews/{id}", tag = "reviews",
    params(("id" = String, Path, description = "Sequential number or UUID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeleteOutputDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutput>, JsonApiError> {
    let id = parse_id(&id)?;
    let deleted = state.reviews.delete(id).await?;
    Ok(Json(DeleteOutput { success: true, deleted }))
}
