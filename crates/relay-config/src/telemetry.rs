use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::upstream::parse_duration;

/// Logging and OTLP export settings
///
/// Console logging is always on. Traces and metrics leave the process only
/// when an `[telemetry.exporter]` table is present.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `service.name` resource attribute
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Extra resource attributes attached to every signal
    #[serde(default)]
    pub resource_attributes: HashMap<String, String>,
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
    /// Fraction of root traces kept, between 0.0 and 1.0
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            resource_attributes: HashMap::new(),
            exporter: None,
            sampling_rate: default_sampling_rate(),
        }
    }
}

impl TelemetryConfig {
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.sampling_rate) {
            anyhow::bail!("telemetry.sampling_rate must be between 0.0 and 1.0, got {}", self.sampling_rate);
        }
        if let Some(exporter) = &self.exporter {
            exporter
                .export_interval()
                .map_err(|e| anyhow::anyhow!("telemetry.exporter.export_interval: {e}"))?;
        }
        Ok(())
    }
}

/// OTLP collector shared by traces and metrics
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
    /// How often metrics are pushed (e.g. "30s")
    #[serde(default = "default_export_interval")]
    pub export_interval: String,
}

impl ExporterConfig {
    /// Parsed metrics push interval
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a valid non-zero duration
    pub fn export_interval(&self) -> anyhow::Result<Duration> {
        parse_duration(&self.export_interval)
    }
}

/// OTLP transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}

fn default_service_name() -> String {
    "relay".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

fn default_export_interval() -> String {
    "30s".to_owned()
}
