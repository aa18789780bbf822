//! Upstream stream adapters
//!
//! Both adapters end every stream with exactly one `Done` event, so clients
//! can rely on the same terminal marker whichever upstream served them.

use std::io;

use bytes::Bytes;
use futures_util::Stream;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tokio_util::io::StreamReader;

pub mod ollama;
pub mod openai;

pub use ollama::ollama_frames;
pub use openai::{chunk_to_events, openai_events};

/// Split an upstream body on `\n` without decoding the bytes
///
/// A final line without a trailing newline is still yielded at end of input.
fn upstream_lines<S>(upstream: S) -> FramedRead<StreamReader<S, Bytes>, AnyDelimiterCodec>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    FramedRead::new(
        StreamReader::new(upstream),
        AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec()),
    )
}

/// Drop the `\r` of a CRLF line ending
fn strip_cr(line: Bytes) -> Bytes {
    if line.ends_with(b"\r") {
        line.slice(..line.len() - 1)
    } else {
        line
    }
}
