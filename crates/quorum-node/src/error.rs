//! Error types for the node service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quorum_types::{AckResponse, IdentityError};
use thiserror::Error;

/// Rejections produced by the node's operations.
///
/// None of these are fatal and none leave partial state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The node was halted and no longer processes messages.
    #[error("Node is not active")]
    Inactive,

    /// The readiness collaborator reports that part of the network is still starting.
    #[error("Some nodes are not ready yet")]
    NotReady,

    /// The node is killed or holds no value, so it can never decide.
    #[error("Node cannot start consensus")]
    CannotStart,
}

impl NodeError {
    /// Short label used in logs and metrics.
    pub const fn reason(&self) -> &'static str {
        match self {
            NodeError::Inactive => "inactive",
            NodeError::NotReady => "not_ready",
            NodeError::CannotStart => "cannot_start",
        }
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(AckResponse::new(self.to_string()))).into_response()
    }
}

/// Errors raised while loading or validating node configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Identity fields are inconsistent.
    #[error("invalid identity: {0}")]
    Identity(#[from] IdentityError),

    /// Configuration file could not be read.
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    /// Configuration file is not valid YAML for a node.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `base_port + node_id` does not fit in a port number.
    #[error("port overflow: base port {base_port} + node id {node_id}")]
    PortOverflow {
        /// Configured base port.
        base_port: u16,
        /// Node index.
        node_id: usize,
    },

    /// Host is not a valid IP address.
    #[error("invalid host: {0}")]
    InvalidHost(String),
}

/// A specialized Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_contract() {
        assert_eq!(NodeError::Inactive.to_string(), "Node is not active");
        assert_eq!(NodeError::NotReady.to_string(), "Some nodes are not ready yet");
        assert_eq!(NodeError::CannotStart.to_string(), "Node cannot start consensus");
    }

    #[test]
    fn test_rejections_are_bad_request() {
        let response = NodeError::CannotStart.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
