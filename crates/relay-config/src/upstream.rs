use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Default Ollama-compatible upstream address
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://ollama:11434";

/// Default OpenAI-compatible upstream base (the `/chat/completions` path is appended)
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Timeout applied to non-streaming upstream calls when none is configured
pub const DEFAULT_TIMEOUT: &str = "60s";

/// Upstream provider configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Ollama-compatible backend
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// OpenAI-compatible backend
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Ollama-compatible backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL; requests go to `{base_url}/api/chat`
    #[serde(default = "default_ollama_base_url")]
    pub base_url: Url,
    /// Timeout for non-streaming calls (e.g. "60s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl OllamaConfig {
    /// Parsed non-streaming timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        parse_duration(&self.timeout)
    }
}

/// OpenAI-compatible backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Bearer token; absent or empty disables the provider
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL; requests go to `{base_url}/chat/completions`
    #[serde(default = "default_openai_base_url")]
    pub base_url: Url,
    /// Timeout for non-streaming calls (e.g. "60s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl OpenAiConfig {
    /// The configured API key, treating an empty string as unset
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().is_empty())
    }

    /// Parsed non-streaming timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        parse_duration(&self.timeout)
    }
}

/// Parse a human-readable, non-zero duration such as `"60s"` or `"2m"`
pub(crate) fn parse_duration(raw: &str) -> anyhow::Result<Duration> {
    let duration = duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid duration '{raw}': {e}"))?;
    if duration.is_zero() {
        anyhow::bail!("duration must be greater than zero");
    }
    Ok(duration)
}

fn default_ollama_base_url() -> Url {
    Url::parse(DEFAULT_OLLAMA_BASE_URL).expect("valid default URL")
}

fn default_openai_base_url() -> Url {
    Url::parse(DEFAULT_OPENAI_BASE_URL).expect("valid default URL")
}

fn default_timeout() -> String {
    DEFAULT_TIMEOUT.to_string()
}
