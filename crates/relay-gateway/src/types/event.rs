use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Normalized event emitted to clients, one per NDJSON line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalEvent {
    /// Incremental message text: `{"message":{"role":..,"content":..}}`
    MessageDelta { role: String, content: String },
    /// Tool-call fragments in upstream order: `{"tool_calls":[..]}`
    ToolCalls(Vec<ToolCall>),
    /// Terminal marker: `{"done":true}`
    Done,
    /// In-band failure: `{"error":".."}`
    Error { message: String },
}

impl CanonicalEvent {
    /// Assistant text delta
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::MessageDelta {
            role: "assistant".to_owned(),
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl Serialize for CanonicalEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::MessageDelta { role, content } => map.serialize_entry("message", &Message { role, content })?,
            Self::ToolCalls(calls) => map.serialize_entry("tool_calls", calls)?,
            Self::Done => map.serialize_entry("done", &true)?,
            Self::Error { message } => map.serialize_entry("error", message)?,
        }
        map.end()
    }
}

/// A single normalized tool call
///
/// `name` and `arguments` may be partial fragments while streaming; the
/// receiver is responsible for concatenating them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCall {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub function: FunctionCall,
}

/// Tool call kind; only functions are supported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Function,
}

/// Function name and raw argument text of a tool call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionCall {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// One line of an outbound NDJSON stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdjsonFrame {
    /// Gateway-produced event
    Event(CanonicalEvent),
    /// Upstream line relayed byte-for-byte (without its newline)
    Passthrough(Bytes),
}

impl NdjsonFrame {
    /// Render as a newline-terminated line
    pub fn into_line(self) -> Bytes {
        let line = match self {
            Self::Event(event) => Bytes::from(serde_json::to_vec(&event).unwrap_or_default()),
            Self::Passthrough(line) => line,
        };
        Bytes::from([&line[..], &b"\n"[..]].concat())
    }
}

impl From<CanonicalEvent> for NdjsonFrame {
    fn from(event: CanonicalEvent) -> Self {
        Self::Event(event)
    }
}
