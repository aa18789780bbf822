//! Mock OpenAI-compatible backend for integration tests
//!
//! Serves `/v1/chat/completions` as JSON or SSE and records each request body
//! together with its `Authorization` header.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// SSE body streaming "Hello" in two deltas
pub const SSE_HELLO: &str = concat!(
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
    "data: {\"id\":\"c1\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
    "data: [DONE]\n\n",
);

/// SSE body announcing one tool call
pub const SSE_TOOL_CALL: &str = concat!(
    "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"type\":\"function\",\"function\":{\"name\":\"get_weather\",\"arguments\":\"\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{}\"}}]}}]}\n\n",
    "data: [DONE]\n\n",
);

/// How the mock answers chat requests
#[derive(Clone)]
pub enum Behavior {
    /// Canned completion, or the given SSE body when streaming
    Reply { sse: &'static str },
    /// Fixed error status on every request
    Fail(StatusCode),
    /// Fixed non-streaming document
    Completion(Value),
}

/// Mock OpenAI-compatible backend
pub struct MockOpenAi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockOpenAiState>,
}

struct MockOpenAiState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

impl MockOpenAi {
    /// Start a mock that streams [`SSE_HELLO`]
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behavior::Reply { sse: SSE_HELLO }).await
    }

    /// Start a mock that streams the given SSE body
    pub async fn start_with_sse(sse: &'static str) -> anyhow::Result<Self> {
        Self::start_with(Behavior::Reply { sse }).await
    }

    /// Start a mock with explicit behavior
    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockOpenAiState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let (addr, shutdown) = super::spawn_router(app).await?;

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the OpenAI upstream
    ///
    /// Includes `/v1` since the provider appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The single request received, panicking otherwise
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockOpenAi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockOpenAiState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    let streaming = body["stream"].as_bool().unwrap_or(false);
    let has_tools = body.get("tools").is_some();
    let model = body["model"].clone();

    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: header(AUTHORIZATION),
        accept: header(ACCEPT),
        body,
    });

    match &state.behavior {
        Behavior::Fail(status) => (
            *status,
            Json(json!({"error": {"message": "mock upstream failure", "type": "server_error"}})),
        )
            .into_response(),
        Behavior::Completion(document) => Json(document.clone()).into_response(),
        Behavior::Reply { sse } if streaming => ([(CONTENT_TYPE, "text/event-stream")], *sse).into_response(),
        Behavior::Reply { .. } => Json(completion(&model, has_tools)).into_response(),
    }
}

fn completion(model: &Value, has_tools: bool) -> Value {
    let message = if has_tools {
        json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_test_123",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"location\":\"Paris\"}"}
            }]
        })
    } else {
        json!({"role": "assistant", "content": "Hello from mock OpenAI"})
    };

    json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}
