//! Request and response bodies of the node HTTP surface.

use crate::Value;
use serde::{Deserialize, Serialize};

/// Snapshot of a node as seen by an observer.
///
/// `x`, `decided` and `k` are `None` (JSON `null`) whenever the node is
/// killed or faulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    /// Whether the node has been halted.
    pub killed: bool,
    /// Value currently held.
    pub x: Option<Value>,
    /// Outcome of the decision attempt.
    pub decided: Option<bool>,
    /// Round counter.
    pub k: Option<u32>,
}

impl NodeState {
    /// A report that reveals nothing but the kill flag.
    pub const fn opaque(killed: bool) -> Self {
        Self {
            killed,
            x: None,
            decided: None,
            k: None,
        }
    }
}

/// Value delivered by a peer to `/message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Index of the sending node.
    pub sender: usize,
    /// Value carried by the message.
    pub value: Value,
}

/// Body of every JSON acknowledgment and rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl AckResponse {
    /// Creates a response carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
