use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde::Serialize;

use super::event::ToolCall;

/// Non-streaming answer, ready to send to the client
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ChatReply {
    /// Relay an upstream answer unchanged
    pub const fn relay(status: StatusCode, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Encode a gateway-built document as a `200` reply
    pub fn json<T: Serialize>(document: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status: StatusCode::OK,
            body: Bytes::from(serde_json::to_vec(document)?),
        })
    }
}

impl IntoResponse for ChatReply {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, "application/json")], Body::from(self.body)).into_response()
    }
}

/// Single-document answer for a non-streaming OpenAI request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatCompletion {
    /// Model as the client sent it, prefix included
    pub model: String,
    pub message: CompletionMessage,
    /// `null` when the upstream made no tool calls
    pub tool_calls: Option<Vec<ToolCall>>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}
