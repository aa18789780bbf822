use std::path::Path;

use secrecy::SecretString;
use url::Url;

use crate::Config;

/// Environment variable overriding the Ollama-compatible base URL
pub const OLLAMA_BASE_URL_VAR: &str = "OLLAMA_BASE_URL";

/// Environment variable carrying the OpenAI API key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build configuration from defaults and the process environment
    ///
    /// Honors `OLLAMA_BASE_URL` and `OPENAI_API_KEY`; an empty key leaves the
    /// OpenAI provider disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if `OLLAMA_BASE_URL` is not a valid URL
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(OLLAMA_BASE_URL_VAR)
            && !raw.trim().is_empty()
        {
            config.upstream.ollama.base_url = Url::parse(raw.trim())
                .map_err(|e| anyhow::anyhow!("invalid {OLLAMA_BASE_URL_VAR} '{raw}': {e}"))?;
        }

        if let Ok(key) = std::env::var(OPENAI_API_KEY_VAR) {
            config.upstream.openai.api_key = Some(SecretString::from(key));
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if an upstream URL has a non-HTTP scheme, a duration
    /// is invalid, or the health path or sampling rate is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_upstreams()?;
        self.validate_health()?;
        if let Some(telemetry) = &self.telemetry {
            telemetry.validate()?;
        }
        Ok(())
    }

    fn validate_upstreams(&self) -> anyhow::Result<()> {
        let ollama = &self.upstream.ollama;
        let openai = &self.upstream.openai;

        for (name, url) in [("ollama", &ollama.base_url), ("openai", &openai.base_url)] {
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("upstream.{name}.base_url must use http or https, got '{}'", url.scheme());
            }
        }

        ollama
            .timeout()
            .map_err(|e| anyhow::anyhow!("upstream.ollama.timeout: {e}"))?;
        openai
            .timeout()
            .map_err(|e| anyhow::anyhow!("upstream.openai.timeout: {e}"))?;

        if openai.api_key().is_none() {
            tracing::debug!("no OpenAI API key configured, openai/ models are disabled");
        }

        Ok(())
    }

    fn validate_health(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }
        Ok(())
    }
}
