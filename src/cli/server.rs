//! HTTP server mode
//!
//! Exposes the handler over HTTP so event notifications can be delivered
//! by a webhook instead of a function runtime.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::decode::StorageEvent;
use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::storage::ObjectLocation;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    handler: Arc<Handler>,
}

/// Request body for `/process`
#[derive(Debug, Deserialize)]
struct ProcessRequest {
    /// Source object (`s3://bucket/key` or `bucket/key`)
    source: String,
}

/// API response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Render a handler error with the matching HTTP status
fn error_response(err: &Error) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(error = %err, retryable = err.is_retryable(), "Request failed");
    }
    (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
}

/// Build the application router
pub fn router(handler: Arc<Handler>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .route("/process", post(process))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { handler })
}

/// Start the HTTP server
pub async fn serve(handler: Arc<Handler>, config: ServerConfig) -> Result<()> {
    let app = router(handler);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {}: {e}", config.port)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// Handle an object-created event notification
async fn invoke(State(state): State<AppState>, body: Bytes) -> Response {
    let event = match StorageEvent::from_slice(&body) {
        Ok(event) => event,
        Err(e) => return error_response(&e),
    };

    match state.handler.handle_event(&event).await {
        Ok(result) => Json(ApiResponse::success(result)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Process a single source object
async fn process(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ProcessRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return error_response(&Error::invalid_event(e.to_string())),
    };

    let source = match ObjectLocation::parse(&request.source) {
        Ok(source) => source,
        Err(e) => return error_response(&e),
    };

    match state.handler.process(&source).await {
        Ok(outcome) => Json(ApiResponse::success(outcome)).into_response(),
        Err(e) => error_response(&e),
    }
}
