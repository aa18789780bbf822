//! Mock Ollama backend for integration tests
//!
//! Serves `/api/chat` with canned JSON or NDJSON and records the raw bodies
//! it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Canned non-streaming answer
pub const COMPLETION: &str =
    r#"{"model":"llama3","created_at":"2024-01-01T00:00:00Z","message":{"role":"assistant","content":"Hello from mock Ollama"},"done":true,"eval_count":5}"#;

/// Canned streaming answer, one document per line
pub const STREAM_LINES: [&str; 3] = [
    r#"{"model":"llama3","message":{"role":"assistant","content":"Hel"},"done":false}"#,
    r#"{"model":"llama3","message":{"role":"assistant","content":"lo"},"done":false}"#,
    r#"{"model":"llama3","message":{"role":"assistant","content":""},"done":true,"eval_count":2}"#,
];

/// Mock Ollama backend
pub struct MockOllama {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockOllamaState>,
}

struct MockOllamaState {
    status: StatusCode,
    requests: Mutex<Vec<Bytes>>,
}

impl MockOllama {
    /// Start a mock that answers every request successfully
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_status(StatusCode::OK).await
    }

    /// Start a mock that answers every request with the given status
    pub async fn start_with_status(status: StatusCode) -> anyhow::Result<Self> {
        let state = Arc::new(MockOllamaState {
            status,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/chat", routing::post(handle_chat))
            .with_state(Arc::clone(&state));

        let (addr, shutdown) = super::spawn_router(app).await?;

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the Ollama upstream
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw request bodies received so far
    pub fn requests(&self) -> Vec<Bytes> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockOllama {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat(State(state): State<Arc<MockOllamaState>>, body: Bytes) -> Response {
    let streaming = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value["stream"].as_bool())
        .unwrap_or(false);

    state.requests.lock().unwrap().push(body);

    if !state.status.is_success() {
        return (
            state.status,
            [(CONTENT_TYPE, "application/json")],
            r#"{"error":"model 'missing' not found"}"#,
        )
            .into_response();
    }

    if streaming {
        let mut body = STREAM_LINES.join("\n");
        body.push('\n');
        return ([(CONTENT_TYPE, "application/x-ndjson")], body).into_response();
    }

    ([(CONTENT_TYPE, "application/json")], COMPLETION).into_response()
}
