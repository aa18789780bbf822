//! Tool-call normalization across `OpenAI` function-calling generations

use crate::protocol::openai::{OpenAiDelta, OpenAiFunctionCall};
use crate::types::{FunctionCall, ToolCall, ToolKind};

/// Map a delta (or full message) to canonical tool calls
///
/// The legacy `function_call` field is checked first and wins when both
/// forms are present. Returns `None` rather than an empty list when the delta
/// carries no function tool calls, so callers can branch on presence.
pub fn normalize_tool_calls(delta: &OpenAiDelta) -> Option<Vec<ToolCall>> {
    if let Some(function_call) = delta
        .function_call
        .as_ref()
        .filter(|f| f.name.is_some() || f.arguments.is_some())
    {
        return Some(vec![ToolCall {
            id: None,
            kind: ToolKind::Function,
            function: function_fields(Some(function_call)),
        }]);
    }

    let calls: Vec<ToolCall> = delta
        .tool_calls
        .as_deref()?
        .iter()
        .filter(|call| call.kind.as_deref() == Some("function"))
        .map(|call| ToolCall {
            id: call.id.clone(),
            kind: ToolKind::Function,
            function: function_fields(call.function.as_ref()),
        })
        .collect();

    (!calls.is_empty()).then_some(calls)
}

fn function_fields(function: Option<&OpenAiFunctionCall>) -> FunctionCall {
    function.map_or_else(FunctionCall::default, |f| FunctionCall {
        name: f.name.clone(),
        arguments: f.arguments.clone(),
    })
}
