//! Ollama-compatible provider
//!
//! Ollama's native format is already the gateway's client-facing format, so
//! this provider forwards request bytes untouched and relays answers as-is.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use http::StatusCode;
use http::header::CONTENT_TYPE;
use relay_config::OllamaConfig;
use reqwest::Client;

use super::{FrameStream, Provider};
use crate::adapter::ollama_frames;
use crate::error::GatewayError;
use crate::routing::ChatCall;
use crate::types::{CanonicalEvent, ChatReply, NdjsonFrame};

const PROVIDER: &str = "ollama";

/// Ollama-compatible provider
pub struct OllamaProvider {
    client: Client,
    chat_url: String,
    timeout: Duration,
}

impl OllamaProvider {
    /// Create from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timeout is invalid.
    pub fn new(client: Client, config: &OllamaConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            chat_url: super::endpoint(&config.base_url, "api/chat"),
            timeout: config.timeout()?,
        })
    }

    fn request(&self, call: &ChatCall) -> reqwest::RequestBuilder {
        self.client
            .post(&self.chat_url)
            .header(CONTENT_TYPE, "application/json")
            .body(call.body.clone())
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, call: &ChatCall) -> Result<ChatReply, GatewayError> {
        let response = self.request(call).timeout(self.timeout).send().await.map_err(|e| {
            tracing::error!(provider = PROVIDER, error = %e, "upstream request failed");
            GatewayError::Upstream(e.to_string())
        })?;

        let status: StatusCode = response.status();
        if !status.is_success() {
            tracing::warn!(provider = PROVIDER, status = %status, "upstream returned error, relaying");
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(provider = PROVIDER, error = %e, "failed to read upstream body");
            GatewayError::Upstream(e.to_string())
        })?;

        Ok(ChatReply::relay(status, body))
    }

    fn complete_stream(&self, call: &ChatCall) -> FrameStream {
        let request = self.request(call);

        Box::pin(async_stream::stream! {
            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(provider = PROVIDER, error = %e, "upstream stream request failed");
                    yield NdjsonFrame::from(CanonicalEvent::error(format!("upstream request failed: {e}")));
                    yield NdjsonFrame::from(CanonicalEvent::Done);
                    return;
                }
            };

            // Ollama reports errors as a single NDJSON line, which is relayed like any other
            if !response.status().is_success() {
                tracing::warn!(provider = PROVIDER, status = %response.status(), "upstream stream returned error");
            }

            let body = response.bytes_stream().map_err(std::io::Error::other);
            let mut frames = std::pin::pin!(ollama_frames(body));
            while let Some(frame) = frames.next().await {
                yield frame;
            }
        })
    }
}
