use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use student_records::document::{Document, Patch};
use student_records::{build_app, AppError, AppState, ListQuery, MemoryStore, PatchPolicy, ServiceConfig, StudentStore};
use tower::util::ServiceExt;

/// A store whose backend is always down.
struct UnreachableStore;

#[async_trait]
impl StudentStore for UnreachableStore {
    async fn insert(&self, _id: &str, _doc: Document) -> Result<(), AppError> {
        Err(AppError::Store(sqlx::Error::PoolTimedOut))
    }
    async fn list(&self, _query: &ListQuery) -> Result<Vec<Document>, AppError> {
        Err(AppError::Store(sqlx::Error::PoolTimedOut))
    }
    async fn find(&self, _id: &str) -> Result<Option<Document>, AppError> {
        Err(AppError::Store(sqlx::Error::PoolTimedOut))
    }
    async fn update(&self, _id: &str, _patch: &Patch) -> Result<Option<Document>, AppError> {
        Err(AppError::Store(sqlx::Error::PoolTimedOut))
    }
    async fn delete(&self, _id: &str) -> Result<bool, AppError> {
        Err(AppError::Store(sqlx::Error::PoolTimedOut))
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Store(sqlx::Error::PoolTimedOut))
    }
}

fn app_on(store: Arc<dyn StudentStore>, env: &[(&str, &str)]) -> Router {
    let env: Vec<(String, String)> = env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let config = ServiceConfig::from_lookup(|k| env.iter().find(|(ek, _)| ek == k).map(|(_, v)| v.clone())).unwrap();
    build_app(AppState::new(store, PatchPolicy::Strict), &config)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_and_version() {
    let app = app_on(Arc::new(MemoryStore::new()), &[]);
    let (status, json) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));

    let (_, json) = get_json(app, "/version").await;
    assert_eq!(json["name"], "student-records");
}

#[tokio::test]
async fn ready_reflects_store_reachability() {
    let (status, json) = get_json(app_on(Arc::new(MemoryStore::new()), &[]), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["store"], "ok");

    let (status, json) = get_json(app_on(Arc::new(UnreachableStore), &[]), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json, json!({ "status": "degraded", "store": "unavailable" }));
}

#[tokio::test]
async fn store_failures_are_server_errors() {
    let (status, json) = get_json(app_on(Arc::new(UnreachableStore), &[]), "/students/abc").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "store_error");
    assert_eq!(json["error"]["message"], "database error");
}

#[tokio::test]
async fn openapi_documents_student_paths() {
    let (status, json) = get_json(app_on(Arc::new(MemoryStore::new()), &[]), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/students/"));
    assert!(paths.contains_key("/students/{id}"));
    assert!(json["paths"]["/students/{id}"].get("patch").is_some());
    assert!(json["components"]["schemas"].get("Student").is_some());
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let app = app_on(Arc::new(MemoryStore::new()), &[("CORS_ALLOWED_ORIGINS", "http://allowed.test")]);
    let request = |origin: &str| {
        Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(request("http://allowed.test")).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://allowed.test"
    );

    let response = app.oneshot(request("http://other.test")).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

async fn post_json(app: Router, content_type: Option<&str>, bytes: Vec<u8>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/students/")
        .header(header::CONTENT_LENGTH, bytes.len());
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let response = app.oneshot(builder.body(Body::from(bytes)).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn oversized_body_is_rejected_with_error_body() {
    let store = Arc::new(MemoryStore::new());
    let app = app_on(store.clone(), &[("MAX_BODY_BYTES", "64")]);
    let body = json!({ "name": "x".repeat(200), "age": 1, "address": { "city": "a", "country": "b" } });
    let (status, json) = post_json(app, Some("application/json"), serde_json::to_vec(&body).unwrap()).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"]["code"], "payload_too_large");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn body_within_limit_is_accepted() {
    let app = app_on(Arc::new(MemoryStore::new()), &[("MAX_BODY_BYTES", "256")]);
    let body = json!({ "name": "Ada", "age": 1, "address": { "city": "a", "country": "b" } });
    let (status, json) = post_json(app, Some("application/json"), serde_json::to_vec(&body).unwrap()).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
}

#[tokio::test]
async fn missing_content_type_is_unsupported_media_type() {
    let app = app_on(Arc::new(MemoryStore::new()), &[]);
    let body = json!({ "name": "Ada", "age": 1, "address": { "city": "a", "country": "b" } });
    let (status, json) = post_json(app, None, serde_json::to_vec(&body).unwrap()).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["error"]["code"], "unsupported_media_type");
}
