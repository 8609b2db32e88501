//! HTTP routes

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use llmrelay_core::client::ChatService;
use llmrelay_core::logging::Logger;
use llmrelay_core::types::{ChatCompletion, ChatCompletionChunk, ChatCompletionRequest};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ChatService>,
    pub logger: Arc<dyn Logger>,
}

impl AppState {
    pub fn new(service: Arc<dyn ChatService>, logger: Arc<dyn Logger>) -> Self {
        Self { service, logger }
    }
}

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/models", get(list_models))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    time_stamp: String,
    model: String,
    api_usage: u64,
    failed_api_calls: u64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time_stamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        model: state.service.model_name().to_string(),
        api_usage: state.service.api_usage(),
        failed_api_calls: state.service.failed_api_calls(),
    })
}

async fn chat_completions(
    State(state): State<AppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Response {
    let stream = request.wants_stream();
    match state.service.complete(request).await {
        Ok(completion) if stream => event_stream(&completion, &state.logger),
        Ok(completion) => Json(completion).into_response(),
        Err(err) => error_response(err, &state.logger),
    }
}

async fn list_models(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{ "id": state.service.model_name(), "object": "model" }],
    }))
}

/// The whole completion as one `chat.completion.chunk` event, then `[DONE]`
fn event_stream(completion: &ChatCompletion, logger: &Arc<dyn Logger>) -> Response {
    let created = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    let chunk = ChatCompletionChunk::from_completion(completion, created);
    let data = match serde_json::to_string(&chunk) {
        Ok(data) => data,
        Err(err) => return error_response(err, logger),
    };

    let events = [format!("data: {}\n\n", data), "data: [DONE]\n\n".to_string()];
    let body = Body::from_stream(futures::stream::iter(
        events.into_iter().map(Ok::<_, Infallible>),
    ));

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

fn error_response(err: impl Display, logger: &Arc<dyn Logger>) -> Response {
    let message = err.to_string();
    logger.error(&format!("[Server] Chat completion failed: {}", message));
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
