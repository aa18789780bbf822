//! `OpenAI` SSE stream to canonical events

use std::io;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use relay_telemetry::GatewayMetrics;

use super::{strip_cr, upstream_lines};
use crate::normalize::normalize_tool_calls;
use crate::protocol::openai::{DONE_SENTINEL, OpenAiStreamChunk};
use crate::types::CanonicalEvent;

const PROVIDER: &str = "openai";

const DATA_PREFIX: &str = "data:";

/// Decode an `OpenAI` SSE byte stream into canonical events
///
/// The body is read line by line: every `data:` line is one payload and
/// every other line is ignored, so blank-line event framing is not required.
/// Undecodable payloads are dropped (logged and counted), never surfaced.
/// Consumption stops at `[DONE]`, at the end of the upstream body, or at a
/// transport error; the last of these also yields an `Error` event. Every
/// path finishes with a single `Done`.
pub fn openai_events<S>(upstream: S, metrics: GatewayMetrics) -> impl Stream<Item = CanonicalEvent> + Send + 'static
where
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    async_stream::stream! {
        let mut lines = std::pin::pin!(upstream_lines(upstream));

        while let Some(next) = lines.next().await {
            let line = match next {
                Ok(line) => strip_cr(line),
                Err(e) => {
                    tracing::warn!(provider = PROVIDER, error = %e, "upstream stream interrupted");
                    yield CanonicalEvent::error(format!("upstream stream interrupted: {e}"));
                    break;
                }
            };

            let Some(data) = std::str::from_utf8(&line).ok().and_then(|text| text.strip_prefix(DATA_PREFIX)) else {
                if line.starts_with(DATA_PREFIX.as_bytes()) {
                    tracing::debug!(provider = PROVIDER, "skipping non-UTF-8 SSE line");
                    metrics.record_dropped_fragment(PROVIDER);
                }
                continue;
            };

            let data = data.trim();
            if data.is_empty() {
                continue;
            }
            if data == DONE_SENTINEL {
                break;
            }

            match serde_json::from_str::<OpenAiStreamChunk>(data) {
                Ok(chunk) => {
                    for canonical in chunk_to_events(chunk) {
                        yield canonical;
                    }
                }
                Err(e) => {
                    tracing::debug!(provider = PROVIDER, error = %e, data = %data, "skipping unparseable SSE chunk");
                    metrics.record_dropped_fragment(PROVIDER);
                }
            }
        }

        yield CanonicalEvent::Done;
    }
}

/// Map one decoded chunk to zero, one, or two canonical events
///
/// Only the first choice is read. Text comes before tool calls when a chunk
/// carries both.
pub fn chunk_to_events(chunk: OpenAiStreamChunk) -> Vec<CanonicalEvent> {
    let Some(delta) = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .filter(|delta| !delta.is_empty())
    else {
        return Vec::new();
    };

    let tool_calls = normalize_tool_calls(&delta);

    delta
        .content
        .map(CanonicalEvent::assistant)
        .into_iter()
        .chain(tool_calls.map(CanonicalEvent::ToolCalls))
        .collect()
}
