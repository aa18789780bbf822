//! Provider trait and upstream implementations

pub mod ollama;
pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use url::Url;

use crate::error::GatewayError;
use crate::routing::ChatCall;
use crate::types::{ChatReply, NdjsonFrame};

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Outbound NDJSON line stream handed to the HTTP layer
pub type FrameStream = Pin<Box<dyn Stream<Item = NdjsonFrame> + Send>>;

/// Trait implemented by each upstream backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Make one bounded upstream call and build the client reply
    async fn complete(&self, call: &ChatCall) -> Result<ChatReply, GatewayError>;

    /// Open a streaming upstream call
    ///
    /// Failures are reported in-band as `Error` events, so this never fails
    /// up front. The upstream connection is opened on first poll and lives
    /// exactly as long as the returned stream.
    fn complete_stream(&self, call: &ChatCall) -> FrameStream;
}

/// Join an endpoint path onto a configured base URL
fn endpoint(base_url: &Url, path: &str) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{base}/{path}")
}
