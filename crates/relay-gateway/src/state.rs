//! Shared gateway state

use std::sync::Arc;

use relay_config::UpstreamConfig;
use relay_telemetry::GatewayMetrics;
use reqwest::Client;

use crate::provider::{OllamaProvider, OpenAiProvider, Provider};
use crate::routing::Route;

/// Shared state for the chat route handler
#[derive(Clone)]
pub struct GatewayState {
    inner: Arc<GatewayStateInner>,
}

struct GatewayStateInner {
    ollama: OllamaProvider,
    openai: OpenAiProvider,
    metrics: GatewayMetrics,
}

impl GatewayState {
    /// Build both providers around one pooled HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a configured
    /// timeout is invalid
    pub fn from_config(config: &UpstreamConfig, metrics: GatewayMetrics) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;

        let ollama = OllamaProvider::new(client.clone(), &config.ollama)?;
        let openai = OpenAiProvider::new(client, &config.openai, metrics.clone())?;

        tracing::debug!(
            ollama = %config.ollama.base_url,
            openai = %config.openai.base_url,
            openai_key = config.openai.api_key().is_some(),
            "gateway providers ready"
        );

        Ok(Self {
            inner: Arc::new(GatewayStateInner { ollama, openai, metrics }),
        })
    }

    /// Provider serving a route
    pub fn provider(&self, route: &Route) -> &dyn Provider {
        match route {
            Route::OpenAi { .. } => &self.inner.openai,
            Route::Ollama => &self.inner.ollama,
        }
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }
}
