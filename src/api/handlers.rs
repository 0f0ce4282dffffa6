//! API Handlers
//!
//! HTTP request handlers for each cache gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use serde_json::Value;

use crate::cache::S3Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    AddResponse, ClearResponse, ExistsResponse, GetResponse, HealthResponse, KeyResponse,
    SetRequest,
};
use crate::store::{open_store, ObjectStore};

/// Cache engine over a dynamically chosen store.
pub type DynCache = S3Cache<Arc<dyn ObjectStore>>;

/// Application state shared across all handlers.
///
/// The engine keeps no mutable state of its own, so a plain Arc suffices.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DynCache>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: DynCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Opens the configured store and builds the cache on top of it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = open_store(config.backend, &config.store_options, &config.store_dir)?;
        Ok(Self::new(S3Cache::new(store, config.cache_settings())))
    }
}

fn ttl_from_request(ttl: Option<i64>) -> Result<Option<Duration>> {
    ttl.map(|secs| {
        Duration::try_seconds(secs)
            .ok_or_else(|| CacheError::InvalidRequest(format!("TTL out of range: {}", secs)))
    })
    .transpose()
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get::<Value>(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for PUT /cache/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    let ttl = ttl_from_request(req.ttl)?;
    state.cache.set(&key, &req.value, ttl).await?;
    Ok(Json(KeyResponse::stored(key)))
}

/// Handler for POST /cache/:key/add
///
/// Responds 201 when stored, 409 when a live entry already exists.
pub async fn add_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<(StatusCode, Json<AddResponse>)> {
    let ttl = ttl_from_request(req.ttl)?;
    let added = state.cache.add(&key, &req.value, ttl).await?;
    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(AddResponse { key, added })))
}

/// Handler for GET /cache/:key/exists
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let exists = state.cache.has(&key).await?;
    Ok(Json(ExistsResponse { key, exists }))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    state.cache.delete(&key).await?;
    Ok(Json(KeyResponse::deleted(key)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_entry_count(
        state.cache.entry_count().await,
    ))
}
