//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs through `tracing`
//! - **Prometheus Metrics**: per-node HTTP and consensus counters
//! - **Request Tracing**: request ID propagation on every call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quorum_node::observability::{init_logging, request_id, LogFormat};
//!
//! init_logging("info", LogFormat::Pretty);
//!
//! let app: axum::Router<()> = axum::Router::new().layer(axum::middleware::from_fn(request_id));
//! ```

mod logging;
mod metrics;
pub mod middleware;

pub use logging::{init_logging, LogFormat};
pub use metrics::{HttpLabels, NodeMetrics, OutcomeLabels};
pub use middleware::{record_http_metrics, request_id, REQUEST_ID_HEADER};
