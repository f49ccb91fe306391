//! Metrics collection for observability

use prometheus::{
    CounterVec, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Facts API metrics
    pub facts_insert_requests: CounterVec,
    pub facts_pipeline_failures: CounterVec,

    // Chat API metrics
    pub chat_requests: CounterVec,

    pub request_duration: HistogramVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let facts_insert_requests = register_counter_vec_with_registry!(
            Opts::new("facts_insert_requests_total", "Total facts insert requests"),
            &["status"],
            registry
        )?;

        let facts_pipeline_failures = register_counter_vec_with_registry!(
            Opts::new(
                "facts_pipeline_failures_total",
                "Facts ingestion failures by pipeline stage"
            ),
            &["stage"],
            registry
        )?;

        let chat_requests = register_counter_vec_with_registry!(
            Opts::new("chat_requests_total", "Total chat requests"),
            &["status"],
            registry
        )?;

        let request_duration = register_histogram_vec_with_registry!(
            "request_duration_seconds",
            "API request duration in seconds",
            &["endpoint"],
            registry
        )?;

        Ok(Self {
            registry,
            facts_insert_requests,
            facts_pipeline_failures,
            chat_requests,
            request_duration,
        })
    }

    /// Record a facts insert request
    pub fn record_facts_insert(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.facts_insert_requests.with_label_values(&[status]).inc();
    }

    /// Record which ingestion stage failed
    pub fn record_pipeline_failure(&self, stage: &str) {
        self.facts_pipeline_failures.with_label_values(&[stage]).inc();
    }

    /// Record a chat request
    pub fn record_chat(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.chat_requests.with_label_values(&[status]).inc();
    }

    /// Observe how long an endpoint took
    pub fn observe_duration(&self, endpoint: &str, seconds: f64) {
        self.request_duration
            .with_label_values(&[endpoint])
            .observe(seconds);
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
