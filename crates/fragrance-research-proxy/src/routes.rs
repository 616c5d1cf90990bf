/*
[INPUT]:  HTTP requests under /api/research and /health
[OUTPUT]: Forwarded upstream responses or local error responses
[POS]:    HTTP surface - axum router and handlers
[UPDATE]: When adding routes or changing request extraction
*/

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use fragrance_research_adapter::NOTES_REQUIRED;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::error::ProxyError;
use crate::forward::{Forwarded, TaskProxy};

pub fn router(proxy: TaskProxy) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/research/start", post(start_handler))
        .route("/api/research/status/{task_id}", get(status_handler))
        .route("/api/research/cancel/{task_id}", post(cancel_handler))
        .layer(cors)
        .with_state(Arc::new(proxy))
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok", "service": "fragrance-research-proxy"}))
}

async fn start_handler(
    State(proxy): State<Arc<TaskProxy>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Forwarded, ProxyError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "unreadable start body");
        ProxyError::Validation(NOTES_REQUIRED.to_string())
    })?;
    proxy.start(&body).await
}

async fn status_handler(
    State(proxy): State<Arc<TaskProxy>>,
    Path(task_id): Path<String>,
) -> Result<Forwarded, ProxyError> {
    proxy.status(&task_id).await
}

async fn cancel_handler(
    State(proxy): State<Arc<TaskProxy>>,
    Path(task_id): Path<String>,
) -> Result<Forwarded, ProxyError> {
    proxy.cancel(&task_id).await
}
