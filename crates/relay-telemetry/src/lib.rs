//! Telemetry for Relay
//!
//! Structured logging via the `tracing` ecosystem, with optional OTLP export
//! of traces and metrics

mod metadata;
pub mod metrics;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use relay_config::TelemetryConfig;
use relay_config::telemetry::{ExportProtocol, ExporterConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use metrics::GatewayMetrics;

/// Keeps OTLP providers alive; flushes and shuts them down on drop
#[must_use = "dropping the guard shuts telemetry down"]
#[derive(Default)]
pub struct TelemetryGuard {
    meter_provider: Option<SdkMeterProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
        if let Some(provider) = self.meter_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown meter provider: {e}");
        }
    }
}

/// Install the global subscriber and, when configured, OTLP export
///
/// `RUST_LOG` takes precedence over `default_filter`. Hold the returned
/// guard for the lifetime of the process.
///
/// # Errors
///
/// Returns an error if an OTLP exporter cannot be built or the export
/// interval is invalid
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = tracing_subscriber::fmt::layer().with_target(true).boxed();

    let mut guard = TelemetryGuard::default();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![console];

    let export = config.and_then(|c| c.exporter.as_ref().map(|exporter| (c, exporter)));
    if let Some((telemetry, exporter)) = export {
        let resource = metadata::build_resource(telemetry);

        let meter_provider = meter_provider(exporter, resource.clone())?;
        global::set_meter_provider(meter_provider.clone());
        guard.meter_provider = Some(meter_provider);

        let tracer_provider = tracer_provider(exporter, telemetry.sampling_rate, resource)?;
        layers.push(
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer("relay"))
                .boxed(),
        );
        global::set_tracer_provider(tracer_provider.clone());
        guard.tracer_provider = Some(tracer_provider);
    }

    tracing_subscriber::registry().with(layers).with(filter).init();

    if let Some((_, exporter)) = export {
        tracing::debug!(endpoint = %exporter.endpoint, protocol = ?exporter.protocol, "OTLP export enabled");
    }

    Ok(guard)
}

fn meter_provider(config: &ExporterConfig, resource: Resource) -> anyhow::Result<SdkMeterProvider> {
    let endpoint = config.endpoint.as_str();
    let exporter = match config.protocol {
        ExportProtocol::Grpc => MetricExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => MetricExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build metrics exporter: {e}"))?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(config.export_interval()?)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}

fn tracer_provider(config: &ExporterConfig, sampling_rate: f64, resource: Resource) -> anyhow::Result<SdkTracerProvider> {
    let endpoint = config.endpoint.as_str();
    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => SpanExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build span exporter: {e}"))?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::ParentBased(Box::new(root_sampler(sampling_rate))))
        .with_batch_exporter(exporter)
        .build())
}

fn root_sampler(rate: f64) -> Sampler {
    match rate {
        r if r >= 1.0 => Sampler::AlwaysOn,
        r if r <= 0.0 => Sampler::AlwaysOff,
        r => Sampler::TraceIdRatioBased(r),
    }
}
