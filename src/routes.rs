//! HTTP routes for the document server.
//!
//! - `GET /health`: Health check
//! - `GET /documents/{id}`: The stored JSON array, `[]` if never written
//! - `POST|PUT /documents/{id}`: Replace the document with the JSON array in the body

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::storage::{DocumentStorage, StorageError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    storage: Arc<RwLock<DocumentStorage>>,
}

impl AppState {
    pub fn new(storage: DocumentStorage) -> Self {
        Self {
            storage: Arc::new(RwLock::new(storage)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/documents/{id}",
            get(get_document).post(replace_document).put(replace_document),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn error_response(status: StatusCode, error: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error,
            message: message.into(),
        }),
    )
        .into_response()
}

fn storage_error(err: StorageError) -> Response {
    match err {
        StorageError::InvalidId(_) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
        }
        _ => {
            tracing::error!("Storage failure: {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Failed to access document",
            )
        }
    }
}

fn document_response(items: Vec<Value>) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(Value::Array(items)),
    )
        .into_response()
}

async fn get_document(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let storage = state.storage.read().await;
    match storage.load(&id) {
        Ok(items) => document_response(items.unwrap_or_default()),
        Err(e) => storage_error(e),
    }
}

async fn replace_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    if let Err(e) = DocumentStorage::validate_id(&id) {
        return storage_error(e);
    }

    let items = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_document",
                "Document must be a JSON array",
            )
        }
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_json",
                format!("Body is not valid JSON: {}", e),
            )
        }
    };

    let storage = state.storage.write().await;
    match storage.save(&id, &items) {
        Ok(()) => {
            tracing::info!("Replaced document {} ({} items)", id, items.len());
            document_response(items)
        }
        Err(e) => storage_error(e),
    }
}
