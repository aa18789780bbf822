//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram};

pub const REQUEST_COUNT: &str = "relay.request.count";
pub const REQUEST_DURATION: &str = "relay.request.duration";
pub const STREAM_DROPPED_FRAGMENTS: &str = "relay.stream.dropped_fragments";

/// Instruments recorded by the chat gateway
///
/// Built from the global meter provider, so construct it after
/// [`crate::init`] has run. Before that the instruments are no-ops.
#[derive(Clone)]
pub struct GatewayMetrics {
    requests: Counter<u64>,
    duration: Histogram<f64>,
    dropped_fragments: Counter<u64>,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        let meter = opentelemetry::global::meter("relay");

        Self {
            requests: meter
                .u64_counter(REQUEST_COUNT)
                .with_description("Chat requests handled, by provider and mode")
                .build(),
            duration: meter
                .f64_histogram(REQUEST_DURATION)
                .with_unit("s")
                .with_description("Time until the response finished; streams are measured to the end of the body")
                .build(),
            dropped_fragments: meter
                .u64_counter(STREAM_DROPPED_FRAGMENTS)
                .with_description("Upstream stream fragments discarded as undecodable")
                .build(),
        }
    }

    /// Count a handled request and record how long it took to finish
    pub fn record_request(&self, provider: &'static str, streaming: bool, status: u16, start: Instant) {
        let attributes = [
            KeyValue::new("provider", provider),
            KeyValue::new("stream", streaming),
            KeyValue::new("status", i64::from(status)),
        ];
        self.requests.add(1, &attributes);
        self.duration.record(start.elapsed().as_secs_f64(), &attributes);
    }

    /// Count one discarded upstream fragment
    pub fn record_dropped_fragment(&self, provider: &'static str) {
        self.dropped_fragments.add(1, &[KeyValue::new("provider", provider)]);
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GatewayMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayMetrics").finish_non_exhaustive()
    }
}
