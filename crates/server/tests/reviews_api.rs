use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, IdStrategy, RatingPolicy, StorageBackend};
use serde_json::{json, Value};
use service::reviews::ReviewStore;
use service::storage::MemoryBackend;
use tower::ServiceExt;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app_with(id_strategy: IdStrategy) -> Router {
    let store = ReviewStore::open(Arc::new(MemoryBackend), id_strategy, RatingPolicy::Strict).await;
    routes::build_router(ServerState::new(store), cors(), None)
}

async fn build_app() -> Router {
    build_app_with(IdStrategy::Sequential).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn anna() -> Value {
    json!({"reviewer": "Anna", "bookTitle": "Snö", "author": "Lina", "review": "Bra bok", "rating": 4})
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = build_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_list_delete_flow() -> anyhow::Result<()> {
    let app = build_app().await;

    let (status, created) = send(&app, "POST", "/reviews", Some(anna())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["reviewer"], "Anna");
    assert_eq!(created["bookTitle"], "Snö");
    assert_eq!(created["author"], "Lina");
    assert_eq!(created["review"], "Bra bok");
    assert_eq!(created["rating"], 4);
    assert!(created["timestamp"].is_string());

    let (_, list) = send(&app, "GET", "/reviews", None).await?;
    assert_eq!(list, json!([created.clone()]));

    let (status, deleted) = send(&app, "DELETE", "/reviews/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);
    assert_eq!(deleted["deleted"], created);

    let (_, list) = send(&app, "GET", "/reviews", None).await?;
    assert_eq!(list, json!([]));

    let (status, body) = send(&app, "DELETE", "/reviews/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn empty_reviewer_is_rejected() -> anyhow::Result<()> {
    let app = build_app().await;
    let mut body = anna();
    body["reviewer"] = json!("");

    let (status, err) = send(&app, "POST", "/reviews", Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Validation Error");
    assert!(err["detail"].as_str().unwrap_or_default().contains("reviewer"));

    let (_, list) = send(&app, "GET", "/reviews", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() -> anyhow::Result<()> {
    let app = build_app().await;
    let mut body = anna();
    body["rating"] = json!(7);
    let (status, _) = send(&app, "POST", "/reviews", Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn client_supplied_id_and_timestamp_are_ignored() -> anyhow::Result<()> {
    let app = build_app().await;
    let mut body = anna();
    body["id"] = json!(500);
    body["timestamp"] = json!("1999-01-01T00:00:00Z");

    let (status, created) = send(&app, "POST", "/reviews", Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_ne!(created["timestamp"], "1999-01-01T00:00:00Z");
    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_in_place() -> anyhow::Result<()> {
    let app = build_app().await;
    send(&app, "POST", "/reviews", Some(anna())).await?;
    let (_, second) = send(&app, "POST", "/reviews", Some(anna())).await?;
    send(&app, "POST", "/reviews", Some(anna())).await?;

    let changed = json!({"reviewer": "Bo", "bookTitle": "Regn", "author": "Ann", "review": "Sådär", "rating": "2"});
    let (status, updated) = send(&app, "PUT", "/reviews/2", Some(changed)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], second["id"]);
    assert_eq!(updated["reviewer"], "Bo");
    assert_eq!(updated["rating"], 2);

    let (_, list) = send(&app, "GET", "/reviews", None).await?;
    let ids: Vec<i64> = list.as_array().expect("array").iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(list[1], updated);

    let (status, fetched) = send(&app, "GET", "/reviews/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);
    Ok(())
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() -> anyhow::Result<()> {
    let app = build_app().await;
    send(&app, "POST", "/reviews", Some(anna())).await?;
    let (_, before) = send(&app, "GET", "/reviews", None).await?;

    let (status, _) = send(&app, "PUT", "/reviews/99", Some(anna())).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/reviews/not-an-id", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/reviews/{}", Uuid::new_v4()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, after) = send(&app, "GET", "/reviews", None).await?;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_id_reports_not_found_before_validation() -> anyhow::Result<()> {
    let app = build_app().await;
    let (status, _) = send(&app, "PUT", "/reviews/5", Some(json!({"reviewer": ""}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn urlencoded_form_is_accepted() -> anyhow::Result<()> {
    let app = build_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/reviews")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("reviewer=Anna&bookTitle=Sn%C3%B6&author=Lina&review=Bra+bok&rating=4"))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let created: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(created["bookTitle"], "Snö");
    assert_eq!(created["review"], "Bra bok");
    assert_eq!(created["rating"], 4);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_client_error() -> anyhow::Result<()> {
    let app = build_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/reviews")
        .header("content-type", "application/json")
        .body(Body::from("{\"reviewer\": "))?;
    let resp = app.clone().oneshot(req).await?;
    assert!(resp.status().is_client_error());
    Ok(())
}

#[tokio::test]
async fn uuid_store_addresses_reviews_by_token() -> anyhow::Result<()> {
    let app = build_app_with(IdStrategy::Uuid).await;
    let (_, created) = send(&app, "POST", "/reviews", Some(anna())).await?;
    let id = created["id"].as_str().expect("uuid id").to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let (status, _) = send(&app, "DELETE", &format!("/reviews/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/reviews/{id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn file_backed_app_keeps_reviews_across_restart() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("reviews_api_{}.json", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.backend = StorageBackend::File;
    cfg.storage.file_path = path.to_string_lossy().into_owned();
    cfg.server.frontend_dir = "/nonexistent-frontend".into();

    let app = server::startup::build_app(&cfg).await;
    send(&app, "POST", "/reviews", Some(anna())).await?;
    let (_, second) = send(&app, "POST", "/reviews", Some(anna())).await?;
    let (_, before) = send(&app, "GET", "/reviews", None).await?;
    drop(app);

    let restarted = server::startup::build_app(&cfg).await;
    let (_, after) = send(&restarted, "GET", "/reviews", None).await?;
    assert_eq!(before, after);
    let (_, third) = send(&restarted, "POST", "/reviews", Some(anna())).await?;
    assert_eq!(third["id"], second["id"].as_i64().unwrap_or_default() + 1);

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn corrupt_file_serves_empty_list() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("reviews_corrupt_api_{}.json", Uuid::new_v4()));
    tokio::fs::write(&path, b"not json at all").await?;
    let mut cfg = AppConfig::default();
    cfg.storage.backend = StorageBackend::File;
    cfg.storage.file_path = path.to_string_lossy().into_owned();

    let app = server::startup::build_app(&cfg).await;
    let (status, list) = send(&app, "GET", "/reviews", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = build_app().await;
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/reviews"].is_object());
    Ok(())
}
