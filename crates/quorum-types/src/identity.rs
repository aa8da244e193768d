//! Node identity and the Byzantine fault threshold.

use crate::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Computes the quorum threshold for a network of `total_nodes`.
///
/// This is `floor(total_nodes / 3) + 1`, the largest fault count the
/// simulated network still tolerates.
pub const fn quorum_threshold(total_nodes: usize) -> usize {
    total_nodes / 3 + 1
}

/// Errors returned when an identity is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The network has no nodes.
    #[error("network must contain at least one node")]
    EmptyNetwork,

    /// The node index falls outside the network.
    #[error("node id {node_id} out of range for {total_nodes} nodes")]
    NodeIdOutOfRange {
        /// Offending node index.
        node_id: usize,
        /// Network size.
        total_nodes: usize,
    },

    /// More faulty nodes than nodes.
    #[error("faulty count {faulty_count} exceeds network size {total_nodes}")]
    TooManyFaulty {
        /// Configured faulty count.
        faulty_count: usize,
        /// Network size.
        total_nodes: usize,
    },
}

/// Immutable identity of a node, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    /// Index of this node in `[0, total_nodes)`.
    pub node_id: usize,
    /// Size of the simulated network.
    pub total_nodes: usize,
    /// Number of faulty nodes in the network. Every node is given the same count.
    pub faulty_count: usize,
    /// Whether this node behaves as faulty.
    #[serde(default)]
    pub is_faulty: bool,
    /// Starting opinion. Ignored for faulty nodes.
    #[serde(default)]
    pub initial_value: Value,
}

impl NodeIdentity {
    /// Creates the identity of a correct node.
    pub fn correct(
        node_id: usize,
        total_nodes: usize,
        faulty_count: usize,
        initial_value: Value,
    ) -> Self {
        Self {
            node_id,
            total_nodes,
            faulty_count,
            is_faulty: false,
            initial_value,
        }
    }

    /// Creates the identity of a faulty node.
    pub fn faulty(node_id: usize, total_nodes: usize, faulty_count: usize) -> Self {
        Self {
            node_id,
            total_nodes,
            faulty_count,
            is_faulty: true,
            initial_value: Value::Unknown,
        }
    }

    /// Quorum threshold of the network this node belongs to.
    pub const fn threshold(&self) -> usize {
        quorum_threshold(self.total_nodes)
    }

    /// Whether the network's fault count is within the tolerated bound.
    pub const fn tolerates_faults(&self) -> bool {
        self.faulty_count <= self.threshold()
    }

    /// Checks that the identity describes a node that can exist.
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.total_nodes == 0 {
            return Err(IdentityError::EmptyNetwork);
        }
        if self.node_id >= self.total_nodes {
            return Err(IdentityError::NodeIdOutOfRange {
                node_id: self.node_id,
                total_nodes: self.total_nodes,
            });
        }
        if self.faulty_count > self.total_nodes {
            return Err(IdentityError::TooManyFaulty {
                faulty_count: self.faulty_count,
                total_nodes: self.total_nodes,
            });
        }
        Ok(())
    }
}
