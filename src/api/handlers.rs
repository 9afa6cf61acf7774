//! API Handlers
//!
//! HTTP request handlers exposing the cache helper.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::cache::{CacheHelper, MAX_KEY_LENGTH};
use crate::error::ApiError;
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheHelper>,
}

impl AppState {
    pub fn new(cache: CacheHelper) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

fn check_key(key: &str) -> Result<(), ApiError> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(ApiError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Handler for PUT /api/cache/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>, ApiError> {
    check_key(&key)?;
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl().unwrap_or_else(|| state.cache.default_ttl());
    if !state.cache.set(&key, &req.value, Some(ttl)).await {
        return Err(ApiError::Unavailable(format!("failed to store key '{}'", key)));
    }

    Ok(Json(SetResponse::new(key, ttl.as_secs())))
}

/// Handler for GET /api/cache/:key
///
/// Store failures read as a miss, same as an absent key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>, ApiError> {
    check_key(&key)?;
    match state.cache.get::<Value>(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /api/cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    check_key(&key)?;
    if !state.cache.delete(&key).await {
        return Err(ApiError::Unavailable(format!("failed to delete key '{}'", key)));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(state.cache.backend_name(), &stats))
}

/// Handler for GET /health
///
/// 503 with status "degraded" when the backing store does not answer.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let backend = state.cache.backend_name();
    match state.cache.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy(backend))),
        Err(err) => {
            warn!(backend, error = %err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::degraded(backend)),
            )
        }
    }
}
