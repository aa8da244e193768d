//! The consensus node service.
//!
//! [`ConsensusNode`] ties a node's immutable [`NodeIdentity`] to its
//! [`NodeSession`] and to the injected [`Readiness`] collaborator. Every
//! operation takes the session lock once and runs its whole
//! read-validate-mutate cycle under it, so concurrent requests never observe
//! a half-applied transition.

use parking_lot::Mutex;
use quorum_types::{MessageRequest, NodeIdentity, NodeState};
use std::sync::Arc;

use crate::error::{NodeError, Result};
use crate::observability::NodeMetrics;
use crate::readiness::Readiness;
use crate::session::{Decision, Liveness, NodeSession, Receipt};

/// A single participant of the simulated network.
pub struct ConsensusNode {
    identity: NodeIdentity,
    session: Mutex<NodeSession>,
    readiness: Arc<dyn Readiness>,
    metrics: NodeMetrics,
}

impl ConsensusNode {
    /// Creates a node in its initial state.
    pub fn new(identity: NodeIdentity, readiness: Arc<dyn Readiness>) -> Self {
        Self {
            session: Mutex::new(NodeSession::new(&identity)),
            identity,
            readiness,
            metrics: NodeMetrics::new(),
        }
    }

    /// Identity this node was created with.
    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// Metrics of this node.
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    /// Number of messages retained in the log.
    pub fn received_count(&self) -> usize {
        self.session.lock().received_messages().len()
    }

    /// Liveness check.
    pub fn status(&self) -> Liveness {
        self.session.lock().liveness()
    }

    /// Delivers a peer message to this node.
    pub fn receive_message(&self, message: MessageRequest) -> Result<Receipt> {
        let node_id = self.identity.node_id;
        let result = self.session.lock().receive(message);

        match result {
            Ok(receipt) => {
                tracing::info!(
                    node_id,
                    sender = message.sender,
                    value = %message.value,
                    ?receipt,
                    "Received message"
                );
                self.metrics.record_message(match receipt {
                    Receipt::Recorded => "recorded",
                    Receipt::Discarded => "discarded",
                });
            }
            Err(ref e) => {
                tracing::debug!(node_id, sender = message.sender, error = %e, "Message rejected");
                self.metrics.record_message("rejected");
            }
        }

        result
    }

    /// Fails with [`NodeError::Inactive`] once the node has been halted.
    pub fn ensure_active(&self) -> Result<()> {
        if self.session.lock().is_killed() {
            self.metrics.record_message("rejected");
            return Err(NodeError::Inactive);
        }
        Ok(())
    }

    /// Runs the one-shot decision attempt.
    ///
    /// The outcome is only visible through [`ConsensusNode::state`]; a
    /// successful return means the attempt completed, not that agreement
    /// was reached.
    pub fn start(&self) -> Result<Decision> {
        let node_id = self.identity.node_id;

        if !self.readiness.all_ready() {
            tracing::warn!(node_id, "Start requested before all nodes are ready");
            self.metrics.record_start_rejection(NodeError::NotReady.reason());
            return Err(NodeError::NotReady);
        }

        let result = self.session.lock().attempt_decision(&self.identity);

        match result {
            Ok(Decision::Agreed(value)) => {
                tracing::info!(node_id, %value, threshold = self.identity.threshold(), "Reached agreement");
                self.metrics.record_decision("agreed");
            }
            Ok(Decision::Exhausted) => {
                tracing::info!(
                    node_id,
                    faulty_count = self.identity.faulty_count,
                    threshold = self.identity.threshold(),
                    "Unable to reach consensus (too many faults)"
                );
                self.metrics.record_decision("exhausted");
            }
            Err(e) => {
                tracing::warn!(node_id, error = %e, "Start rejected");
                self.metrics.record_start_rejection(e.reason());
            }
        }

        result
    }

    /// Halts the node. Idempotent.
    pub fn stop(&self) {
        let changed = self.session.lock().halt();
        if changed {
            self.metrics.killed.set(1);
            tracing::info!(node_id = self.identity.node_id, "Node has been marked as stopped");
        }
    }

    /// Observer report of the node.
    pub fn state(&self) -> NodeState {
        self.session.lock().report()
    }
}

impl std::fmt::Debug for ConsensusNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsensusNode")
            .field("identity", &self.identity)
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::{AlwaysReady, ReadinessBoard};
    use quorum_types::Value;

    #[test]
    fn test_start_requires_readiness() {
        let board = Arc::new(ReadinessBoard::new(2));
        board.mark_ready(0);
        let node = ConsensusNode::new(NodeIdentity::correct(0, 2, 0, Value::Zero), board.clone());

        let before = node.state();
        assert_eq!(node.start(), Err(NodeError::NotReady));
        assert_eq!(node.state(), before);

        board.mark_ready(1);
        assert_eq!(node.start(), Ok(Decision::Agreed(Value::One)));
    }

    #[test]
    fn test_readiness_checked_before_kill() {
        let board = Arc::new(ReadinessBoard::new(2));
        let node = ConsensusNode::new(NodeIdentity::correct(0, 2, 0, Value::Zero), board);
        node.stop();

        assert_eq!(node.start(), Err(NodeError::NotReady));
    }

    #[test]
    fn test_stop_sets_gauge() {
        let node = ConsensusNode::new(
            NodeIdentity::correct(0, 4, 1, Value::Zero),
            Arc::new(AlwaysReady),
        );
        node.stop();
        node.stop();

        assert!(node.state().killed);
        assert_eq!(node.metrics().killed.get(), 1);
    }

    #[test]
    fn test_ensure_active_after_stop() {
        let node = ConsensusNode::new(NodeIdentity::faulty(0, 4, 1), Arc::new(AlwaysReady));
        assert_eq!(node.ensure_active(), Ok(()));

        node.stop();
        assert_eq!(node.ensure_active(), Err(NodeError::Inactive));
    }

    #[test]
    fn test_receive_counts() {
        let node = ConsensusNode::new(
            NodeIdentity::correct(0, 4, 1, Value::Zero),
            Arc::new(AlwaysReady),
        );
        node.receive_message(MessageRequest { sender: 1, value: Value::One })
            .unwrap();
        assert_eq!(node.received_count(), 1);
    }
}
