//! Gateway-facing types, independent of any upstream wire format

pub mod event;
pub mod reply;
pub mod request;

pub use event::{CanonicalEvent, FunctionCall, NdjsonFrame, ToolCall, ToolKind};
pub use reply::{ChatCompletion, ChatReply, CompletionMessage};
pub use request::ChatRequest;
