use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use super::{ApiError, ApiResult, AppState};
use crate::agent::response::GenerateResponse;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /generate?query=...`
pub async fn generate_get(
    State(state): State<AppState>,
    Query(params): Query<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    generate(state, params.query).await
}

/// `POST /generate` with `{"query": "..."}`.
pub async fn generate_post(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    generate(state, body.query).await
}

async fn generate(state: AppState, query: Option<String>) -> ApiResult<Json<GenerateResponse>> {
    let query = query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query is required".into()))?;

    // A panic anywhere in the agent surfaces as a JoinError, not a dropped connection.
    let agent = state.agent.clone();
    let task = tokio::spawn(async move { agent.generate(&query).await });

    match task.await {
        Ok(Ok(response)) => {
            info!(kind = %response.kind(), "query answered");
            Ok(Json(response))
        }
        Ok(Err(e)) => Err(e.into()),
        Err(e) => {
            error!(error = %e, "code generation task failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

/// `GET /` — usage description.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Code Generation API",
        "usage": "Use GET /generate?query=your programming question",
        "example": "/generate?query=Write a Python function to reverse a string",
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /favicon.ico` — served from the static dir, or a JSON marker when absent.
pub async fn favicon(State(state): State<AppState>) -> Response {
    let path = state.static_dir.join("favicon.ico");
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response(),
        Err(_) => Json(json!({"error": "favicon.ico not found"})).into_response(),
    }
}
