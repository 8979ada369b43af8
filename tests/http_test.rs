use academicworld::http::router;
use academicworld::{Dashboard, FavoritesStore, MemoryStore, StoreOp};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::with_sample_data());
    let dashboard = Dashboard::in_memory(store.clone()).await;
    (store, router(Arc::new(dashboard)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_status() {
    let (_, app) = app().await;
    let (status, body) = send(&app, get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], academicworld::VERSION);
}

#[tokio::test]
async fn test_top_keywords_with_range() {
    let (_, app) = app().await;
    let (status, body) = send(&app, get("/api/keywords/top?start=2023&end=2023")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["Keyword", "Publication Count"]));
    assert_eq!(body["records"][0], json!(["machine learning", 2]));
    assert_eq!(body["degraded"], false);

    let (_, body) = send(&app, get("/api/keywords/top")).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_widget_queries() {
    let (_, app) = app().await;

    let (_, body) = send(
        &app,
        get("/api/universities/top?keyword=machine%20learning&start=1982&end=1982"),
    )
    .await;
    assert_eq!(body["records"].as_array().unwrap().len(), 2);

    let (_, body) = send(
        &app,
        get("/api/universities/keyword-scores?university=Carnegie%20Mellon%20University"),
    )
    .await;
    assert_eq!(body["labels"][0], "databases");
    assert_eq!(body["title"], "Top 10 keyword scores for Carnegie Mellon University");

    let (_, body) = send(&app, get("/api/faculty/keyword-scores?faculty=Carol%20Okafor")).await;
    assert_eq!(body["columns"], json!(["Keyword", "Total Score"]));
    assert_eq!(body["records"][0][0], "computer vision");
}

#[tokio::test]
async fn test_options() {
    let (_, app) = app().await;
    let (status, body) = send(&app, get("/api/options")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["universities"].as_array().unwrap().len(), 4);
    assert_eq!(body["faculty"][0], "Alice Chen");
    assert_eq!(body["degraded"], false);
}

#[tokio::test]
async fn test_favorites_add_remove_edit() {
    let (store, app) = app().await;

    let (status, body) = send(
        &app,
        with_json(Method::POST, "/api/favorites", json!({ "keyword": "machine learning" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["change"]["kind"], "added");
    assert_eq!(body["snapshot"]["favorites"], json!(["machine learning"]));
    assert_eq!(body["snapshot"]["top_faculty"][0]["name"], "Alice Chen");

    let (_, body) = send(
        &app,
        with_json(Method::POST, "/api/favorites", json!({ "keyword": "machine learning" })),
    )
    .await;
    assert_eq!(body["change"]["kind"], "unchanged");
    assert_eq!(body["change"]["reason"], "already_favorite");

    send(
        &app,
        with_json(Method::POST, "/api/favorites", json!({ "keyword": "databases" })),
    )
    .await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/favorites/databases")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["change"]["kind"], "removed");
    assert_eq!(store.list_favorites().await.unwrap(), vec!["machine learning"]);

    let (_, body) = send(
        &app,
        with_json(Method::PUT, "/api/favorites", json!({ "keywords": [] })),
    )
    .await;
    assert_eq!(body["change"]["keyword"], "machine learning");
    assert_eq!(body["snapshot"]["favorites"], json!([]));

    let (_, body) = send(&app, get("/api/favorites")).await;
    assert_eq!(body["favorites"], json!([]));
    assert_eq!(body["top_faculty"], json!([]));
}

#[tokio::test]
async fn test_failed_write_returns_service_unavailable() {
    let (store, app) = app().await;
    store.set_failing(StoreOp::WriteFavorites, true);

    let (status, body) = send(
        &app,
        with_json(Method::POST, "/api/favorites", json!({ "keyword": "databases" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("WriteFavorites"));

    let (_, body) = send(&app, get("/api/favorites")).await;
    assert_eq!(body["favorites"], json!([]));
}

#[tokio::test]
async fn test_index_page_is_served() {
    let (_, app) = app().await;
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_year_is_bad_request() {
    let (_, app) = app().await;
    let response = app
        .oneshot(get("/api/keywords/top?start=nineteen"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mistyped_favorites_body_is_bad_request() {
    let (store, app) = app().await;

    let (status, body) = send(
        &app,
        with_json(Method::POST, "/api/favorites", json!({ "name": "databases" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        with_json(Method::PUT, "/api/favorites", json!({ "keywords": "databases" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/favorites")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.list_favorites().await.unwrap().is_empty());
}
