//! Axum router definition and handler functions.
//!
//! Each handler calls the corresponding `api::*_payload` function (synchronous,
//! may do file I/O). Grounded on the teacher's `handle_simulate`/`handle_optimize`
//! shape: state cloned into a closure and run via `tokio::task::spawn_blocking`
//! so the async runtime stays responsive while the rule engine and repository
//! reads/writes run.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::catalog::Catalog;
use crate::config::AiSettings;
use crate::llm::LlmClient;
use crate::repository::Repository;
use crate::server::api;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub repository: Arc<dyn Repository>,
    pub llm: Arc<dyn LlmClient>,
    pub ai_settings: Arc<AiSettings>,
}

struct JsonResponse {
    status: StatusCode,
    body: String,
}

impl IntoResponse for JsonResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        (self.status, headers, self.body).into_response()
    }
}

fn ok_json(body: String) -> JsonResponse {
    JsonResponse { status: StatusCode::OK, body }
}

fn error_json(status: StatusCode, message: &str) -> JsonResponse {
    let body = format!(
        "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
        serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    JsonResponse { status, body }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/catalog/version", get(handle_catalog_version))
        .route("/api/recommend", post(handle_recommend))
        .route("/api/lineup", post(handle_lineup))
        .route("/api/ask", post(handle_ask))
        .with_state(state)
}

async fn handle_health() -> impl IntoResponse {
    match api::health_payload() {
        Ok(body) => ok_json(body).into_response(),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response(),
    }
}

async fn handle_catalog_version(State(state): State<AppState>) -> impl IntoResponse {
    match api::catalog_version_payload(state.catalog.as_ref()) {
        Ok(body) => ok_json(body).into_response(),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response(),
    }
}

fn payload_error_status(err: &api::ApiError) -> StatusCode {
    match err {
        api::ApiError::Parse(_) => StatusCode::BAD_REQUEST,
        api::ApiError::Repository(_) => StatusCode::NOT_FOUND,
    }
}

/// POST /api/recommend — runs the orchestrator; offloaded to the blocking
/// pool because it reads the repository synchronously.
async fn handle_recommend(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let catalog = state.catalog.clone();
    let repository = state.repository.clone();
    let result = tokio::task::spawn_blocking(move || api::recommend_payload(catalog.as_ref(), repository.as_ref(), &body)).await;
    match result {
        Ok(Ok(payload)) => ok_json(payload).into_response(),
        Ok(Err(e)) => error_json(payload_error_status(&e), &e.to_string()).into_response(),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &format!("Task panicked: {e}")).into_response(),
    }
}

/// POST /api/lineup — builds a lineup recommendation for a named mode.
async fn handle_lineup(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let catalog = state.catalog.clone();
    let repository = state.repository.clone();
    let result = tokio::task::spawn_blocking(move || api::lineup_payload(catalog.as_ref(), repository.as_ref(), &body)).await;
    match result {
        Ok(Ok(payload)) => ok_json(payload).into_response(),
        Ok(Err(e)) => error_json(payload_error_status(&e), &e.to_string()).into_response(),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &format!("Task panicked: {e}")).into_response(),
    }
}

/// POST /api/ask — the advisor dispatcher; may block on an LLM round-trip, so
/// like the teacher's optimize handler it runs off the async runtime.
async fn handle_ask(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let catalog = state.catalog.clone();
    let repository = state.repository.clone();
    let llm = state.llm.clone();
    let ai_settings = state.ai_settings.clone();
    let result = tokio::task::spawn_blocking(move || {
        api::ask_payload(catalog.as_ref(), repository.as_ref(), llm.as_ref(), ai_settings.as_ref(), &body)
    })
    .await;
    match result {
        Ok(Ok(payload)) => ok_json(payload).into_response(),
        Ok(Err(e)) => error_json(payload_error_status(&e), &e.to_string()).into_response(),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &format!("Task panicked: {e}")).into_response(),
    }
}
