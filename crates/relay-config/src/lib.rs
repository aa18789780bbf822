#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use health::*;
pub use loader::{OLLAMA_BASE_URL_VAR, OPENAI_API_KEY_VAR};
pub use server::*;
pub use telemetry::TelemetryConfig;
pub use upstream::*;

/// Top-level Relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
