//! Common types used throughout `quorum`.
//!
//! This crate provides the wire and domain types shared by every node in
//! the simulated Byzantine consensus network: the binary [`Value`], the
//! immutable [`NodeIdentity`] and the [`NodeState`] report returned by a
//! node's state endpoint.

mod identity;
mod state;
mod value;

pub use identity::{quorum_threshold, IdentityError, NodeIdentity};
pub use state::{AckResponse, MessageRequest, NodeState};
pub use value::Value;

/// Round counter reported by a node that reached agreement.
pub const ROUND_DECIDED: u32 = 1;

/// Round counter reported by a node that gave up because the network holds
/// more faulty nodes than it can tolerate.
pub const ROUND_EXHAUSTED: u32 = 11;
