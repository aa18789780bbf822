//! Provider selection from the requested model name

use bytes::Bytes;

use crate::error::GatewayError;
use crate::types::ChatRequest;

/// Model prefix that selects the OpenAI-compatible upstream
pub const OPENAI_PREFIX: &str = "openai/";

/// Upstream chosen for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// OpenAI-compatible upstream, with the prefix stripped from the model
    OpenAi { upstream_model: String },
    /// Ollama-compatible upstream, fed the original body
    Ollama,
}

impl Route {
    /// Pick the upstream for a (trimmed) model name
    ///
    /// Anything not starting with `openai/`, including an empty name, goes to
    /// Ollama.
    pub fn resolve(model: &str) -> Self {
        model.strip_prefix(OPENAI_PREFIX).map_or(Self::Ollama, |rest| Self::OpenAi {
            upstream_model: rest.to_owned(),
        })
    }

    pub const fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Ollama => "ollama",
        }
    }
}

/// A decoded chat request together with its routing decision
#[derive(Debug, Clone)]
pub struct ChatCall {
    pub request: ChatRequest,
    /// Original request bytes, forwarded verbatim on the Ollama path
    pub body: Bytes,
    pub route: Route,
}

impl ChatCall {
    /// Decode and route a request body
    pub fn from_body(body: Bytes) -> Result<Self, GatewayError> {
        let request = ChatRequest::from_slice(&body)?;
        let route = Route::resolve(request.model());

        Ok(Self { request, body, route })
    }

    pub fn is_stream(&self) -> bool {
        self.request.is_stream()
    }
}
