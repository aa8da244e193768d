//! Prometheus metrics for a single node.
//!
//! Every node owns its own registry so several nodes can run in one process
//! without sharing counters.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;

/// HTTP request labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabels {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Matched route
    pub path: String,
    /// Response status code
    pub status: u16,
}

/// Labels carrying a single outcome string.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabels {
    /// Outcome name
    pub outcome: String,
}

impl OutcomeLabels {
    fn new(outcome: &str) -> Self {
        Self {
            outcome: outcome.to_string(),
        }
    }
}

/// Metrics of one node.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry.
    registry: Arc<Registry>,
    /// HTTP request counter.
    pub http_requests_total: Family<HttpLabels, Counter>,
    /// HTTP request duration histogram (seconds).
    pub http_request_duration_seconds: Family<HttpLabels, Histogram>,
    /// Peer messages by outcome (recorded, discarded, rejected).
    pub messages_total: Family<OutcomeLabels, Counter>,
    /// Completed decision attempts by outcome (agreed, exhausted).
    pub decisions_total: Family<OutcomeLabels, Counter>,
    /// Rejected decision attempts by reason.
    pub start_rejections_total: Family<OutcomeLabels, Counter>,
    /// 1 once the node is halted.
    pub killed: Gauge,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeMetrics {
    /// Create a new metrics state with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests_total = Family::<HttpLabels, Counter>::default();
        registry.register(
            "quorum_http_requests",
            "Total HTTP requests",
            http_requests_total.clone(),
        );

        let http_request_duration_seconds =
            Family::<HttpLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.0001, 2.0, 16))
            });
        registry.register(
            "quorum_http_request_duration_seconds",
            "HTTP request duration in seconds",
            http_request_duration_seconds.clone(),
        );

        let messages_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "quorum_messages",
            "Peer messages delivered to this node",
            messages_total.clone(),
        );

        let decisions_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "quorum_decisions",
            "Completed decision attempts",
            decisions_total.clone(),
        );

        let start_rejections_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "quorum_start_rejections",
            "Rejected decision attempts",
            start_rejections_total.clone(),
        );

        let killed = Gauge::default();
        registry.register("quorum_node_killed", "Whether the node is halted", killed.clone());

        Self {
            registry: Arc::new(registry),
            http_requests_total,
            http_request_duration_seconds,
            messages_total,
            decisions_total,
            start_rejections_total,
            killed,
        }
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let labels = HttpLabels {
            method: method.to_string(),
            path: path.to_string(),
            status,
        };

        self.http_requests_total.get_or_create(&labels).inc();
        self.http_request_duration_seconds
            .get_or_create(&labels)
            .observe(duration_secs);
    }

    /// Record a delivered peer message.
    pub fn record_message(&self, outcome: &str) {
        self.messages_total
            .get_or_create(&OutcomeLabels::new(outcome))
            .inc();
    }

    /// Record a completed decision attempt.
    pub fn record_decision(&self, outcome: &str) {
        self.decisions_total
            .get_or_create(&OutcomeLabels::new(outcome))
            .inc();
    }

    /// Record a rejected decision attempt.
    pub fn record_start_rejection(&self, reason: &str) {
        self.start_rejections_total
            .get_or_create(&OutcomeLabels::new(reason))
            .inc();
    }

    /// Encode metrics for Prometheus scraping.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if let Err(e) = prometheus_client::encoding::text::encode(&mut buffer, &self.registry) {
            tracing::error!(error = %e, "Failed to encode metrics");
        }
        buffer
    }
}
