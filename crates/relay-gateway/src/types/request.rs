use serde::Deserialize;
use serde_json::Value;

use crate::error::GatewayError;

static NO_MESSAGES: Value = Value::Array(Vec::new());

/// Inbound Ollama-style chat request
///
/// Fields are kept as raw JSON. Only `model` and `stream` are read for every
/// request; the rest is interpreted on the OpenAI path alone. The Ollama path
/// forwards the original bytes, so odd shapes there are never rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// Model identifier; `openai/<name>` selects the OpenAI upstream
    #[serde(default)]
    pub model: Option<Value>,
    /// Conversation messages, forwarded verbatim and in order
    #[serde(default)]
    pub messages: Option<Value>,
    /// Streaming flag, read by truthiness
    #[serde(default)]
    pub stream: Option<Value>,
    /// Sampling options; only `temperature` is forwarded to OpenAI
    #[serde(default)]
    pub options: Option<Value>,
    /// Tool declarations, forwarded verbatim
    #[serde(default)]
    pub tools: Option<Value>,
    /// Tool choice (string or object), forwarded verbatim
    #[serde(default)]
    pub tool_choice: Option<Value>,
}

impl ChatRequest {
    /// Decode a request body
    ///
    /// Only bodies that are not JSON at all fail, with
    /// [`GatewayError::InvalidJson`]. JSON that is not an object reads as an
    /// empty request.
    pub fn from_slice(body: &[u8]) -> Result<Self, GatewayError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| GatewayError::InvalidJson)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        // Every field is an optional `Value`, so any object decodes
        Ok(Self::deserialize(value).unwrap_or_default())
    }

    /// Model name with surrounding whitespace removed (empty when absent or not a string)
    pub fn model(&self) -> &str {
        self.model.as_ref().and_then(Value::as_str).map_or("", str::trim)
    }

    pub fn is_stream(&self) -> bool {
        self.stream.as_ref().is_some_and(truthy)
    }

    /// Messages as sent, or an empty array when missing or falsy
    pub fn messages(&self) -> &Value {
        self.messages.as_ref().filter(|v| truthy(v)).unwrap_or(&NO_MESSAGES)
    }

    pub fn message_count(&self) -> usize {
        self.messages().as_array().map_or(0, Vec::len)
    }

    /// `options.temperature` exactly as sent, when the key is present
    pub fn temperature(&self) -> Option<&Value> {
        self.options.as_ref()?.as_object()?.get("temperature")
    }

    pub fn tools(&self) -> Option<&Value> {
        self.tools.as_ref()
    }

    pub fn tool_choice(&self) -> Option<&Value> {
        self.tool_choice.as_ref()
    }
}

/// JSON truthiness: `null`, `false`, zero and empty containers are false
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
