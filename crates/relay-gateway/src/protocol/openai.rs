//! `OpenAI` chat completion API wire format types
//!
//! Response types are deliberately permissive: every field is optional and
//! unknown fields are ignored, so schema drift upstream only matters for the
//! handful of fields the gateway actually reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal payload of an `OpenAI` SSE stream
pub const DONE_SENTINEL: &str = "[DONE]";

// -- Request types --

/// `OpenAI` chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest<'a> {
    /// Upstream model name (prefix already stripped)
    pub model: &'a str,
    /// Conversation messages, verbatim
    pub messages: &'a Value,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Sampling temperature, forwarded as the client sent it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<&'a Value>,
    /// Tool definitions, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a Value>,
    /// Tool choice, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a Value>,
}

// -- Response types --

/// `OpenAI` non-streaming chat completion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiResponse {
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
}

/// Individual choice in a non-streaming response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiChoice {
    #[serde(default)]
    pub message: Option<OpenAiDelta>,
}

// -- Streaming types --

/// `OpenAI` streaming chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamChunk {
    #[serde(default)]
    pub choices: Vec<OpenAiStreamChoice>,
}

/// Individual choice in a streaming chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamChoice {
    #[serde(default)]
    pub delta: Option<OpenAiDelta>,
}

/// Assistant message content, either a stream delta or a full message
///
/// Streaming deltas and complete response messages share this shape, so the
/// tool-call normalizer handles both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Legacy single function call
    #[serde(default)]
    pub function_call: Option<OpenAiFunctionCall>,
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
}

impl OpenAiDelta {
    /// Whether the delta carries nothing at all
    pub const fn is_empty(&self) -> bool {
        self.role.is_none() && self.content.is_none() && self.function_call.is_none() && self.tool_calls.is_none()
    }
}

/// Tool call entry; every field may be missing on continuation chunks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiToolCall {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub function: Option<OpenAiFunctionCall>,
}

/// Function name and argument fragment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiFunctionCall {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_omits_absent_fields() {
        let messages = json!([{"role": "user", "content": "hi"}]);
        let request = OpenAiRequest {
            model: "gpt-4o",
            messages: &messages,
            stream: None,
            temperature: None,
            tools: None,
            tool_choice: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"model": "gpt-4o", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[test]
    fn request_includes_optional_fields() {
        let messages = json!([]);
        let tools = json!([{"type": "function", "function": {"name": "f"}}]);
        let temperature = json!(0.7);
        let tool_choice = json!("auto");
        let request = OpenAiRequest {
            model: "gpt-4o",
            messages: &messages,
            stream: Some(true),
            temperature: Some(&temperature),
            tools: Some(&tools),
            tool_choice: Some(&tool_choice),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], true);
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["tools"][0]["function"]["name"], "f");
        assert_eq!(value["tool_choice"], "auto");
    }

    #[test]
    fn chunk_ignores_unknown_fields() {
        let chunk: OpenAiStreamChunk = serde_json::from_str(
            r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o",
                "choices":[{"index":0,"delta":{"content":"Hi"},"finish_reason":null,"logprobs":null}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.choices[0].delta.as_ref().unwrap().content.as_deref(), Some("Hi"));
    }

    #[test]
    fn continuation_tool_call_without_type() {
        let chunk: OpenAiStreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"lo"}}]}}]}"#)
                .unwrap();
        let call = &chunk.choices[0].delta.as_ref().unwrap().tool_calls.as_ref().unwrap()[0];
        assert_eq!(call.index, Some(0));
        assert!(call.kind.is_none());
        assert_eq!(call.function.as_ref().unwrap().arguments.as_deref(), Some("{\"lo"));
    }

    #[test]
    fn empty_delta_is_empty() {
        let chunk: OpenAiStreamChunk = serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert!(chunk.choices[0].delta.as_ref().unwrap().is_empty());
    }
}
