//! Integration Tests for the cache gateway and engine
//!
//! Tests full request/response cycles against in-memory, local-directory and
//! failing object stores.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bytes::Bytes;
use chrono::Duration;
use s3_cache::{
    api::create_router, AppState, CacheSettings, MemoryStore, ObjectStore, RemoteStore, S3Cache,
    StoreError,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Store that rejects every operation.
struct UnreachableStore;

#[async_trait]
impl ObjectStore for UnreachableStore {
    async fn put_object(&self, _name: &str, _bytes: Bytes) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn get_object(&self, _name: &str) -> Result<Bytes, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn delete_object(&self, _name: &str) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn list_objects(&self, _prefix: &str, _limit: usize) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unauthorized("bad credentials".to_string()))
    }

    async fn delete_objects(&self, _names: &[String]) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }
}

fn app_with(store: Arc<dyn ObjectStore>, settings: CacheSettings) -> Router {
    create_router(AppState::new(S3Cache::new(store, settings)))
}

fn create_test_app() -> Router {
    app_with(Arc::new(MemoryStore::new()), CacheSettings::default())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_returns_json_value() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/cache/profile",
        Some(r#"{"value":{"name":"ada","langs":["rust"]},"ttl":60}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "profile");

    let (status, json) = send(&app, "GET", "/cache/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"]["name"], "ada");
    assert_eq!(json["value"]["langs"][0], "rust");
}

#[tokio::test]
async fn test_get_missing_is_404() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/cache/nonexistent_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent_key"));
}

#[tokio::test]
async fn test_expired_entry_is_404() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/cache/old", Some(r#"{"value":1,"ttl":-1}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/cache/old", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, json) = send(&app, "GET", "/cache/old/exists", None).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_invalid_key_is_400() {
    let app = create_test_app();

    let (status, json) = send(&app, "PUT", "/cache/bad%20key", Some(r#"{"value":1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid key"));
}

// == ADD ==

#[tokio::test]
async fn test_add_only_when_absent() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/cache/slot/add", Some(r#"{"value":"first"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["added"], true);

    let (status, json) = send(&app, "POST", "/cache/slot/add", Some(r#"{"value":"second"}"#)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["added"], false);

    let (_, json) = send(&app, "GET", "/cache/slot", None).await;
    assert_eq!(json["value"], "first");
}

// == DELETE / CLEAR ==

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/gone", Some(r#"{"value":true}"#)).await;

    let (status, _) = send(&app, "DELETE", "/cache/gone", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/cache/gone", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/cache/gone", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_empties_location() {
    let store = Arc::new(MemoryStore::new());
    store
        .put_object("unrelated/object", Bytes::from_static(b"x"))
        .await
        .unwrap();
    let app = app_with(store.clone(), CacheSettings::default().with_location("site"));

    for key in ["a", "b", "c"] {
        send(&app, "PUT", &format!("/cache/{}", key), Some(r#"{"value":0}"#)).await;
    }
    assert_eq!(store.len().await, 4);

    let (status, _) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.names().await, vec!["unrelated/object"]);

    let (_, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(json["entries"], 0);
}

// == Culling ==

#[tokio::test]
async fn test_culling_keeps_store_bounded() {
    let store = Arc::new(MemoryStore::new());
    let settings = CacheSettings::new(3, 0, Duration::seconds(60)).with_location("bounded");
    let app = app_with(store.clone(), settings);

    for key in ["k1", "k2", "k3"] {
        send(&app, "PUT", &format!("/cache/{}", key), Some(r#"{"value":1}"#)).await;
    }
    assert_eq!(store.len().await, 3);

    send(&app, "PUT", "/cache/k4", Some(r#"{"value":4}"#)).await;
    assert_eq!(store.len().await, 1);

    let (status, json) = send(&app, "GET", "/cache/k4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], 4);
}

// == Store outage ==

#[tokio::test]
async fn test_store_outage_degrades_gracefully() {
    let app = app_with(Arc::new(UnreachableStore), CacheSettings::default());

    let (status, _) = send(&app, "PUT", "/cache/k", Some(r#"{"value":1}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/cache/k/exists", None).await;
    assert_eq!(json["exists"], false);

    let (status, _) = send(&app, "DELETE", "/cache/k", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
}

// == Local directory backend ==

#[tokio::test]
async fn test_engine_over_local_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = RemoteStore::local(dir.path()).unwrap();
    let settings = CacheSettings::new(10, 3, Duration::seconds(60)).with_location("/disk/");
    let cache = S3Cache::new(store, settings);

    cache.set("answer", &42u32, None).await.unwrap();
    assert_eq!(cache.get::<u32>("answer").await.unwrap(), Some(42));
    assert!(!cache.add("answer", &7u32, None).await.unwrap());

    cache.set("stale", &1u32, Some(Duration::seconds(-1))).await.unwrap();
    assert!(!cache.has("stale").await.unwrap());
    assert_eq!(cache.entry_count().await, Some(1));

    cache.clear().await;
    assert_eq!(cache.entry_count().await, Some(0));
}
