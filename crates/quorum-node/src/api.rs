//! HTTP API for a consensus node.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/status` | Liveness: `live` or `faulty` |
//! | POST | `/message` | Deliver a peer value |
//! | GET | `/start` | Run the decision attempt |
//! | GET | `/stop` | Halt the node |
//! | GET | `/getState` | Observer report |
//! | GET | `/metrics` | Prometheus metrics |

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use quorum_types::{AckResponse, MessageRequest};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::NodeError;
use crate::observability::{record_http_metrics, request_id};
use crate::service::ConsensusNode;
use crate::session::Liveness;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The node served by this router.
    pub node: Arc<ConsensusNode>,
}

impl AppState {
    /// Wraps `node` for sharing with handlers.
    pub fn new(node: Arc<ConsensusNode>) -> Self {
        Self { node }
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    let metrics = state.node.metrics().clone();

    Router::new()
        .route("/status", get(status))
        .route("/message", post(receive_message))
        .route("/start", get(start))
        .route("/stop", get(stop))
        .route("/getState", get(get_state))
        .route("/metrics", get(metrics_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            metrics,
            record_http_metrics,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id))
        .with_state(state)
}

/// Liveness check.
async fn status(State(state): State<AppState>) -> Response {
    match state.node.status() {
        Liveness::Live => (StatusCode::OK, "live").into_response(),
        Liveness::Faulty => (StatusCode::INTERNAL_SERVER_ERROR, "faulty").into_response(),
    }
}

/// Receives a value from a peer.
///
/// A halted node answers with the inactive-node rejection whatever the body
/// holds; body errors are only reported by a node that is still active.
async fn receive_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(req)) => match state.node.receive_message(req) {
            Ok(_) => Json(AckResponse::new("Acknowledged")).into_response(),
            Err(e) => e.into_response(),
        },
        Err(rejection) => match state.node.ensure_active() {
            Ok(()) => rejection.into_response(),
            Err(e) => e.into_response(),
        },
    }
}

/// Runs the decision attempt.
async fn start(State(state): State<AppState>) -> Result<Json<AckResponse>, NodeError> {
    state.node.start()?;
    Ok(Json(AckResponse::new("Consensus execution completed")))
}

/// Halts the node.
async fn stop(State(state): State<AppState>) -> Json<AckResponse> {
    state.node.stop();
    Json(AckResponse::new("Node is stopped"))
}

/// Reports the node's state.
async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.node.state())
}

/// Prometheus scrape endpoint.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        Body::from(state.node.metrics().encode()),
    )
        .into_response()
}
