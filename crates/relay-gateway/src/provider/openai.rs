//! OpenAI-compatible provider
//!
//! Requests are rebuilt from the client's Ollama-style body. Streaming
//! answers are decoded from SSE into canonical events; bounded answers are
//! folded into a single completion document.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use http::header::ACCEPT;
use relay_config::OpenAiConfig;
use relay_telemetry::GatewayMetrics;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::{FrameStream, Provider};
use crate::adapter::openai_events;
use crate::error::GatewayError;
use crate::normalize::normalize_tool_calls;
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse};
use crate::routing::{ChatCall, Route};
use crate::types::{CanonicalEvent, ChatCompletion, ChatReply, CompletionMessage, NdjsonFrame};

const PROVIDER: &str = "openai";

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    completions_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
    metrics: GatewayMetrics,
}

impl OpenAiProvider {
    /// Create from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timeout is invalid.
    pub fn new(client: Client, config: &OpenAiConfig, metrics: GatewayMetrics) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            completions_url: super::endpoint(&config.base_url, "chat/completions"),
            api_key: config.api_key().cloned(),
            timeout: config.timeout()?,
            metrics,
        })
    }

    /// Build the outbound request, or fail when no credential is configured
    fn request(&self, call: &ChatCall, stream: bool) -> Result<reqwest::RequestBuilder, GatewayError> {
        let api_key = self.api_key.as_ref().ok_or(GatewayError::MissingApiKey)?;

        let body = OpenAiRequest {
            model: upstream_model(call),
            messages: call.request.messages(),
            stream: stream.then_some(true),
            temperature: call.request.temperature(),
            tools: call.request.tools(),
            tool_choice: call.request.tool_choice(),
        };

        let builder = self
            .client
            .post(&self.completions_url)
            .bearer_auth(api_key.expose_secret())
            .json(&body);

        Ok(if stream {
            builder.header(ACCEPT, "text/event-stream")
        } else {
            builder.timeout(self.timeout)
        })
    }
}

/// Model name to send upstream
fn upstream_model(call: &ChatCall) -> &str {
    match &call.route {
        Route::OpenAi { upstream_model } => upstream_model,
        Route::Ollama => call.request.model(),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, call: &ChatCall) -> Result<ChatReply, GatewayError> {
        let request = self.request(call, false)?;

        let response = request.send().await.map_err(|e| {
            tracing::error!(provider = PROVIDER, error = %e, "upstream request failed");
            GatewayError::Upstream(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(provider = PROVIDER, status = %status, body = %body, "upstream returned error");
            return Err(GatewayError::Upstream(format!("status {status}: {body}")));
        }

        let parsed: OpenAiResponse = response.json().await.map_err(|e| {
            tracing::error!(provider = PROVIDER, error = %e, "failed to decode upstream response");
            GatewayError::Upstream(e.to_string())
        })?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .unwrap_or_default();

        let tool_calls = normalize_tool_calls(&message);

        let completion = ChatCompletion {
            model: call.request.model().to_owned(),
            message: CompletionMessage {
                role: "assistant".to_owned(),
                content: message.content,
            },
            tool_calls,
            done: true,
        };

        ChatReply::json(&completion).map_err(|e| GatewayError::Internal(e.into()))
    }

    fn complete_stream(&self, call: &ChatCall) -> FrameStream {
        let request = match self.request(call, true) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(provider = PROVIDER, error = %e, "rejecting stream");
                // Configuration problem: report it once, no terminal marker
                let frame = NdjsonFrame::from(CanonicalEvent::error(e.client_message()));
                return Box::pin(stream::once(async move { frame }));
            }
        };
        let metrics = self.metrics.clone();

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

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(provider = PROVIDER, status = %status, body = %body, "upstream stream returned error");
                yield NdjsonFrame::from(CanonicalEvent::error(format!("upstream returned {status}: {body}")));
                yield NdjsonFrame::from(CanonicalEvent::Done);
                return;
            }

            let body = response.bytes_stream().map_err(std::io::Error::other);
            let mut events = std::pin::pin!(openai_events(body, metrics));
            while let Some(event) = events.next().await {
                yield NdjsonFrame::from(event);
            }
        })
    }
}
