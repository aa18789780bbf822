//! Ollama NDJSON relay

use std::io;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::{strip_cr, upstream_lines};
use crate::types::{CanonicalEvent, NdjsonFrame};

/// Relay upstream NDJSON lines unchanged and append a terminal `Done`
///
/// Lines are relayed as raw bytes, never decoded or validated, so even
/// invalid UTF-8 passes through. Blank lines are dropped. A read failure
/// ends the relay with an `Error` event before the `Done`.
pub fn ollama_frames<S>(upstream: S) -> impl Stream<Item = NdjsonFrame> + Send + 'static
where
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    async_stream::stream! {
        let mut lines = std::pin::pin!(upstream_lines(upstream));

        while let Some(next) = lines.next().await {
            match next {
                Ok(line) if line.trim_ascii().is_empty() => {}
                Ok(line) => {
                    yield NdjsonFrame::Passthrough(strip_cr(line));
                }
                Err(e) => {
                    tracing::warn!(provider = "ollama", error = %e, "upstream stream interrupted");
                    yield NdjsonFrame::from(CanonicalEvent::error(format!("upstream stream interrupted: {e}")));
                    break;
                }
            }
        }

        yield NdjsonFrame::from(CanonicalEvent::Done);
    }
}
