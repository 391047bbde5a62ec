//! API integration tests
//!
//! The router is driven in-process against a scratch data directory.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use library_server::{
    api, config::AppConfig, repository::Repository, services::Services, AppState,
};

const API_KEY: &str = "test-key";

fn test_app(dir: &TempDir) -> Router {
    let mut config = AppConfig::default();
    config.auth.api_key = API_KEY.to_string();
    config.storage.data_dir = dir.path().to_path_buf();

    let repository = Repository::load(&config.storage).expect("Failed to load storage");
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    };
    api::create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", API_KEY);

    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn seed(app: &Router) {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/books",
        Some(json!({"name": "War and Peace", "author": "Leo Tolstoy"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        "POST",
        "/api/v1/users",
        Some(json!({"name": "John", "surname": "Doe"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check_needs_no_key() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unauthorized_access() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(Request::get("/api/v1/books").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/v1/books")
                .header("X-API-Key", "wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get(format!("/api/v1/books?api_key={}", API_KEY))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_version_info() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "GET", "/api/v2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "2.0");
    assert_eq!(body["features"][0], "delete_operations");
}

#[tokio::test]
async fn test_loan_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({"book_id": 1, "user_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);

    let (status, body) = send(&app, "GET", "/api/v1/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert!(body[0].get("end_at").is_none());

    let (status, body) = send(&app, "POST", "/api/v1/loans/1/return", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");
    assert!(body["loan"]["end_at"].is_string());

    let (status, body) = send(&app, "POST", "/api/v1/loans/5/return", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_loan_for_unknown_book_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    seed(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({"book_id": 42, "user_id": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_renumbers_loans() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    seed(&app).await;
    for _ in 0..3 {
        send(
            &app,
            "POST",
            "/api/v2/loans",
            Some(json!({"book_id": 1, "user_id": 1})),
        )
        .await;
    }

    let (status, _) = send(&app, "DELETE", "/api/v2/loans/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/api/v2/loans", None).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|loan| loan["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![0, 1]);

    let (status, _) = send(&app, "GET", "/api/v2/loans/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_v1_has_no_delete_routes() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    seed(&app).await;

    let (status, _) = send(&app, "DELETE", "/api/v1/books/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, "GET", "/api/v1/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deleting_user_cascades_to_loans() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    seed(&app).await;
    send(
        &app,
        "POST",
        "/api/v2/loans",
        Some(json!({"book_id": 1, "user_id": 1})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", "/api/v2/users/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/api/v2/loans", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_delete_without_matches_succeeds() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "DELETE", "/api/v2/users/42/loans", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn test_invalid_book_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/books",
        Some(json!({"name": "", "author": "Anonymous"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_non_numeric_id_is_a_client_error() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(&app, "GET", "/api/v1/loans/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_state_persists_across_restarts() {
    let dir = TempDir::new().unwrap();
    {
        let app = test_app(&dir);
        seed(&app).await;
        send(
            &app,
            "POST",
            "/api/v1/loans",
            Some(json!({"book_id": 1, "user_id": 1})),
        )
        .await;
    }

    let app = test_app(&dir);
    let (status, body) = send(&app, "GET", "/api/v1/users/1/loans", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["book_id"], 1);
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "GET", "/api/v1/nothing-here", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}
