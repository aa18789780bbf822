//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use relay_config::{Config, ServerConfig};
use secrecy::SecretString;

/// Address nothing listens on, for connection failure tests
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// Both upstreams point at an unreachable address until configured.
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        config.upstream.ollama.base_url = UNREACHABLE_URL.parse().expect("valid URL");
        config.upstream.openai.base_url = UNREACHABLE_URL.parse().expect("valid URL");

        Self { config }
    }

    /// Point the Ollama upstream at a mock backend
    pub fn with_ollama(mut self, base_url: &str) -> Self {
        self.config.upstream.ollama.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Point the OpenAI upstream at a mock backend, with a test key
    pub fn with_openai(mut self, base_url: &str) -> Self {
        self.config.upstream.openai.base_url = base_url.parse().expect("valid URL");
        self.config.upstream.openai.api_key = Some(SecretString::from("test-key"));
        self
    }

    /// Remove the OpenAI key while keeping the base URL
    pub fn without_openai_key(mut self) -> Self {
        self.config.upstream.openai.api_key = None;
        self
    }

    /// Set the non-streaming timeout for both upstreams
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        timeout.clone_into(&mut self.config.upstream.ollama.timeout);
        timeout.clone_into(&mut self.config.upstream.openai.timeout);
        self
    }

    /// Serve health checks at a different path
    pub fn with_health_path(mut self, path: &str) -> Self {
        path.clone_into(&mut self.config.server.health.path);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
