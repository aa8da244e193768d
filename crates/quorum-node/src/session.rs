//! Per-node session state machine.
//!
//! A [`NodeSession`] holds everything a node mutates during its lifetime.
//! Faulty nodes are represented by [`Role::Faulty`], which carries no value,
//! decision or round at all, so a state report can never leak them.
//!
//! ```text
//! Active ──attempt_decision──▶ Decided{true, 1}
//!    │                     └─▶ Decided{false, 11}
//!    └──────── halt ─────────▶ Killed (from any state)
//! ```

use quorum_types::{MessageRequest, NodeIdentity, NodeState, Value, ROUND_DECIDED, ROUND_EXHAUSTED};

use crate::error::{NodeError, Result};

/// Bookkeeping of a correct node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectState {
    /// Value currently held.
    pub value: Value,
    /// Outcome of the last decision attempt.
    pub decided: bool,
    /// Round counter: 0 before any attempt.
    pub round: u32,
    /// Values delivered by peers, in receipt order.
    ///
    /// Only an observational log; the decision procedure never reads it.
    pub received: Vec<Value>,
}

/// Whether the node participates honestly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Faulty node: its value and progress are unobservable.
    Faulty,
    /// Correct node and its state.
    Correct(CorrectState),
}

/// Result of the liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// The node holds a value.
    Live,
    /// The node holds no value.
    Faulty,
}

/// What happened to a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Appended to the message log.
    Recorded,
    /// Dropped silently by a faulty node.
    Discarded,
}

/// Outcome of a decision attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The node adopted the agreement value.
    Agreed(Value),
    /// Too many faults; the node gave up.
    Exhausted,
}

/// Mutable session of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSession {
    killed: bool,
    role: Role,
}

impl NodeSession {
    /// Creates the initial session for `identity`.
    pub fn new(identity: &NodeIdentity) -> Self {
        let role = if identity.is_faulty {
            Role::Faulty
        } else {
            Role::Correct(CorrectState {
                value: identity.initial_value,
                decided: false,
                round: 0,
                received: Vec::new(),
            })
        };

        Self {
            killed: false,
            role,
        }
    }

    /// Whether the node has been halted.
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Role of the node.
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Value held, if any.
    pub fn value(&self) -> Option<Value> {
        match &self.role {
            Role::Faulty => None,
            Role::Correct(state) => Some(state.value),
        }
    }

    /// Values received so far. Always empty for faulty nodes.
    pub fn received_messages(&self) -> &[Value] {
        match &self.role {
            Role::Faulty => &[],
            Role::Correct(state) => &state.received,
        }
    }

    /// Liveness check. Unaffected by `halt`.
    pub fn liveness(&self) -> Liveness {
        match self.value() {
            Some(_) => Liveness::Live,
            None => Liveness::Faulty,
        }
    }

    /// Handles a message delivered by a peer.
    pub fn receive(&mut self, message: MessageRequest) -> Result<Receipt> {
        if self.killed {
            return Err(NodeError::Inactive);
        }

        match &mut self.role {
            Role::Faulty => Ok(Receipt::Discarded),
            Role::Correct(state) => {
                state.received.push(message.value);
                Ok(Receipt::Recorded)
            }
        }
    }

    /// Runs the one-shot decision procedure.
    ///
    /// Readiness of the rest of the network is checked by the caller before
    /// this is invoked.
    pub fn attempt_decision(&mut self, identity: &NodeIdentity) -> Result<Decision> {
        if self.killed {
            return Err(NodeError::CannotStart);
        }
        let Role::Correct(state) = &mut self.role else {
            return Err(NodeError::CannotStart);
        };

        if identity.tolerates_faults() {
            state.value = Value::One;
            state.decided = true;
            state.round = ROUND_DECIDED;
            Ok(Decision::Agreed(state.value))
        } else {
            state.decided = false;
            state.round = ROUND_EXHAUSTED;
            Ok(Decision::Exhausted)
        }
    }

    /// Halts the node. Returns true if this call changed the state.
    pub fn halt(&mut self) -> bool {
        !std::mem::replace(&mut self.killed, true)
    }

    /// Builds the observer report, hiding everything for killed or faulty nodes.
    pub fn report(&self) -> NodeState {
        match &self.role {
            Role::Correct(state) if !self.killed => NodeState {
                killed: false,
                x: Some(state.value),
                decided: Some(state.decided),
                k: Some(state.round),
            },
            _ => NodeState::opaque(self.killed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: usize, value: Value) -> MessageRequest {
        MessageRequest { sender, value }
    }

    #[test]
    fn test_initial_correct_state() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::Zero);
        let session = NodeSession::new(&identity);

        assert_eq!(session.liveness(), Liveness::Live);
        assert_eq!(
            session.report(),
            NodeState {
                killed: false,
                x: Some(Value::Zero),
                decided: Some(false),
                k: Some(0),
            }
        );
    }

    #[test]
    fn test_initial_faulty_state() {
        let identity = NodeIdentity::faulty(1, 4, 1);
        let session = NodeSession::new(&identity);

        assert_eq!(session.liveness(), Liveness::Faulty);
        assert_eq!(session.report(), NodeState::opaque(false));
    }

    #[test]
    fn test_decides_within_tolerance() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::Zero);
        let mut session = NodeSession::new(&identity);

        assert_eq!(
            session.attempt_decision(&identity),
            Ok(Decision::Agreed(Value::One))
        );
        assert_eq!(
            session.report(),
            NodeState {
                killed: false,
                x: Some(Value::One),
                decided: Some(true),
                k: Some(1),
            }
        );
    }

    #[test]
    fn test_exhausts_beyond_tolerance() {
        let identity = NodeIdentity::correct(0, 4, 3, Value::Zero);
        let mut session = NodeSession::new(&identity);

        assert_eq!(session.attempt_decision(&identity), Ok(Decision::Exhausted));
        assert_eq!(
            session.report(),
            NodeState {
                killed: false,
                x: Some(Value::Zero),
                decided: Some(false),
                k: Some(11),
            }
        );
    }

    #[test]
    fn test_faulty_cannot_decide() {
        let identity = NodeIdentity::faulty(0, 4, 1);
        let mut session = NodeSession::new(&identity);

        assert_eq!(
            session.attempt_decision(&identity),
            Err(NodeError::CannotStart)
        );
        assert_eq!(session.report(), NodeState::opaque(false));
    }

    #[test]
    fn test_killed_cannot_decide() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::Zero);
        let mut session = NodeSession::new(&identity);
        session.halt();

        let before = session.clone();
        assert_eq!(
            session.attempt_decision(&identity),
            Err(NodeError::CannotStart)
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_receive_appends_in_order() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::Zero);
        let mut session = NodeSession::new(&identity);

        assert_eq!(session.receive(msg(1, Value::One)), Ok(Receipt::Recorded));
        assert_eq!(session.receive(msg(2, Value::Unknown)), Ok(Receipt::Recorded));
        assert_eq!(session.receive(msg(1, Value::One)), Ok(Receipt::Recorded));

        assert_eq!(
            session.received_messages(),
            &[Value::One, Value::Unknown, Value::One]
        );
    }

    #[test]
    fn test_message_log_does_not_affect_decision() {
        let identity = NodeIdentity::correct(0, 4, 3, Value::Zero);
        let mut session = NodeSession::new(&identity);
        for sender in 1..4 {
            session.receive(msg(sender, Value::One)).unwrap();
        }

        assert_eq!(session.attempt_decision(&identity), Ok(Decision::Exhausted));
        assert_eq!(session.value(), Some(Value::Zero));
    }

    #[test]
    fn test_faulty_discards_messages() {
        let identity = NodeIdentity::faulty(0, 4, 1);
        let mut session = NodeSession::new(&identity);

        assert_eq!(session.receive(msg(1, Value::One)), Ok(Receipt::Discarded));
        assert!(session.received_messages().is_empty());
    }

    #[test]
    fn test_halt_is_idempotent() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::One);
        let mut session = NodeSession::new(&identity);

        assert!(session.halt());
        assert!(!session.halt());
        assert!(session.is_killed());
        assert_eq!(session.report(), NodeState::opaque(true));
    }

    #[test]
    fn test_killed_rejects_messages() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::One);
        let mut session = NodeSession::new(&identity);
        session.receive(msg(1, Value::Zero)).unwrap();
        session.halt();

        assert_eq!(session.receive(msg(2, Value::Zero)), Err(NodeError::Inactive));
        assert_eq!(session.received_messages(), &[Value::Zero]);
    }

    #[test]
    fn test_killed_correct_node_still_live() {
        let identity = NodeIdentity::correct(0, 4, 1, Value::One);
        let mut session = NodeSession::new(&identity);
        session.halt();

        assert_eq!(session.liveness(), Liveness::Live);
    }
}
