//! HTTP request handlers

use crate::{ChatGateway, ChatRequest};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
    pub author: Arc<str>,
}

impl AppState {
    pub fn new(gateway: ChatGateway, author: impl Into<Arc<str>>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            author: author.into(),
        }
    }
}

/// `GET /models`
pub async fn list_models(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "author": &*state.author,
        "available_models": state.gateway.models(),
    }))
}

/// `GET /chat?model=..&prompt=..`
pub async fn chat_query(
    State(state): State<AppState>,
    query: Option<Query<ChatRequest>>,
) -> Response {
    let request = query.map(|Query(q)| q).unwrap_or_default();
    chat(&state, request).await
}

/// `POST /chat` with `{ "model": .., "prompt": .. }`
///
/// A missing or unparsable body is treated as an empty request. Failing to
/// read the body at all (e.g. over the size limit) keeps axum's rejection.
pub async fn chat_body(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::BytesRejection(rejection)) => return rejection.into_response(),
        Err(rejection) => {
            debug!("Unusable chat body: {}", rejection.body_text());
            ChatRequest::default()
        }
    };
    chat(&state, request).await
}

async fn chat(state: &AppState, request: ChatRequest) -> Response {
    match state.gateway.handle(request).await {
        Ok(text) => (
            StatusCode::OK,
            Json(json!({
                "author": &*state.author,
                "response": text,
            })),
        )
            .into_response(),
        Err(e) => {
            if e.is_client_error() {
                debug!("Rejected chat request: {}", e);
            } else {
                warn!("Chat request failed: {}", e);
            }
            (e.status_code(), Json(e.to_body(&state.author))).into_response()
        }
    }
}

/// `GET /health`
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
