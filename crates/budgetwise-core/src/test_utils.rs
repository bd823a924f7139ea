//! Test utilities for budgetwise-core
//!
//! A mock advice provider server that speaks the Gemini, Ollama and
//! OpenAI-compatible wire formats, for backend tests and local development.
//!
//! Canned behavior:
//! - API key or bearer token `bad-key` is rejected (403 / 401)
//! - a prompt of exactly `EMPTY` yields a response with no text
//! - a prompt of exactly `FAIL` yields a 500
//! - anything else is answered with `"<Provider> advice for: <prompt>"`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::{oneshot, Mutex};

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    /// `x-goog-api-key` header (Gemini)
    pub api_key: Option<String>,
    /// Bearer token from the Authorization header (OpenAI-compatible)
    pub bearer: Option<String>,
    pub body: Value,
}

type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// Mock advice provider server for testing and development
pub struct MockProviderServer {
    addr: SocketAddr,
    requests: Recorder,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProviderServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let requests: Recorder = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/v1beta/models", get(gemini_models))
            .route("/v1beta/models/:model_action", post(gemini_generate))
            .route("/api/tags", get(ollama_tags))
            .route("/api/generate", post(ollama_generate))
            .route("/v1/models", get(openai_models))
            .route("/v1/chat/completions", post(openai_chat))
            .with_state(requests.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Generation requests received so far (health checks are not recorded)
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockProviderServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn canned(provider: &str, prompt: &str) -> Result<Option<String>, StatusCode> {
    match prompt {
        "FAIL" => Err(StatusCode::INTERNAL_SERVER_ERROR),
        "EMPTY" => Ok(None),
        _ => Ok(Some(format!("{} advice for: {}", provider, prompt))),
    }
}

fn goog_api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn gemini_models(headers: HeaderMap) -> StatusCode {
    match goog_api_key(&headers).as_deref() {
        Some("bad-key") | None => StatusCode::FORBIDDEN,
        Some(_) => StatusCode::OK,
    }
}

async fn gemini_generate(
    State(requests): State<Recorder>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let api_key = goog_api_key(&headers);
    requests.lock().await.push(RecordedRequest {
        path: format!("/v1beta/models/{}", model_action),
        api_key: api_key.clone(),
        bearer: None,
        body: body.clone(),
    });

    if !model_action.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if matches!(api_key.as_deref(), Some("bad-key") | None) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "API key not valid"}})),
        )
            .into_response();
    }

    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    match canned("Gemini", prompt) {
        Err(status) => status.into_response(),
        Ok(None) => Json(json!({"candidates": []})).into_response(),
        Ok(Some(text)) => {
            // Split across two parts to exercise concatenation
            let mid = (0..=text.len() / 2)
                .rev()
                .find(|i| text.is_char_boundary(*i))
                .unwrap_or(0);
            let (head, tail) = text.split_at(mid);
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": head}, {"text": tail}]},
                    "finishReason": "STOP"
                }]
            }))
            .into_response()
        }
    }
}

async fn ollama_tags() -> Json<Value> {
    Json(json!({
        "models": [{"name": "llama3.2:latest", "modified_at": "2024-01-01T00:00:00Z", "size": 4_000_000_000u64}]
    }))
}

async fn ollama_generate(State(requests): State<Recorder>, Json(body): Json<Value>) -> Response {
    requests.lock().await.push(RecordedRequest {
        path: "/api/generate".to_string(),
        api_key: None,
        bearer: None,
        body: body.clone(),
    });

    let prompt = body["prompt"].as_str().unwrap_or_default();
    match canned("Ollama", prompt) {
        Err(status) => status.into_response(),
        Ok(text) => Json(json!({
            "model": body["model"],
            "response": text.unwrap_or_default(),
            "done": true
        }))
        .into_response(),
    }
}

async fn openai_models(headers: HeaderMap) -> StatusCode {
    match bearer(&headers).as_deref() {
        Some("bad-key") => StatusCode::UNAUTHORIZED,
        _ => StatusCode::OK,
    }
}

async fn openai_chat(
    State(requests): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let token = bearer(&headers);
    requests.lock().await.push(RecordedRequest {
        path: "/v1/chat/completions".to_string(),
        api_key: None,
        bearer: token.clone(),
        body: body.clone(),
    });

    if token.as_deref() == Some("bad-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API key"}})),
        )
            .into_response();
    }

    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    match canned("OpenAI", prompt) {
        Err(status) => status.into_response(),
        Ok(None) => Json(json!({"choices": []})).into_response(),
        Ok(Some(text)) => Json(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
    }
}
