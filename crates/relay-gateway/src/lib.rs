//! Chat gateway core for Relay
//!
//! Accepts Ollama-style `/api/chat` requests and serves them from either an
//! Ollama-compatible or an OpenAI-compatible upstream. Whichever upstream
//! answers, clients see the same NDJSON event stream (or a single JSON
//! document when streaming is off).

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod error;
pub mod handler;
pub mod normalize;
pub mod protocol;
pub mod provider;
pub mod routing;
pub mod state;
pub mod types;

pub use error::GatewayError;
pub use handler::gateway_router;
pub use normalize::normalize_tool_calls;
pub use provider::{FrameStream, Provider};
pub use routing::{ChatCall, Route};
pub use state::GatewayState;
pub use types::{CanonicalEvent, ChatCompletion, ChatReply, ChatRequest, NdjsonFrame, ToolCall};
