//! # Quorum Node
//!
//! A single participant of a simulated Byzantine-fault-tolerant binary
//! consensus network, exposed as an HTTP service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Quorum Node                  │
//! ├──────────────────────────────────────────────┤
//! │  HTTP API    /status /message /start         │
//! │              /stop /getState /metrics        │
//! │                      │                       │
//! │  ConsensusNode ── Readiness (injected)       │
//! │                      │                       │
//! │  NodeSession  (Faulty | Correct state)       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A harness launches one node per index, waits for every node to announce
//! itself through [`readiness::Readiness`], calls `/start` on each, then
//! reads `/getState`.
//!
//! ## Quick Start
//!
//! ```bash
//! # Whole network in one process, node 3 faulty
//! cargo run --bin quorum-node -- --total-nodes 4 --faulty-count 1 --network --faulty-nodes 3
//!
//! # A single node; the network is assumed ready
//! cargo run --bin quorum-node -- --node-id 0 --total-nodes 4 --faulty-count 1
//! ```
//!
//! ## Modules
//!
//! - [`api`] - HTTP routes and handlers
//! - [`config`] - Node configuration and endpoint derivation
//! - [`error`] - Rejection and configuration errors
//! - [`observability`] - Structured logging, metrics, and request tracing
//! - [`readiness`] - The injected "are all nodes ready" capability
//! - [`server`] - Binding a node and serving it
//! - [`service`] - The consensus node service
//! - [`session`] - Per-node state machine
//!
//! ## Example: Driving a node in-process
//!
//! ```rust
//! use std::sync::Arc;
//! use quorum_node::readiness::AlwaysReady;
//! use quorum_node::service::ConsensusNode;
//! use quorum_types::{NodeIdentity, Value};
//!
//! let node = ConsensusNode::new(
//!     NodeIdentity::correct(0, 4, 1, Value::Zero),
//!     Arc::new(AlwaysReady),
//! );
//! node.start().unwrap();
//!
//! let state = node.state();
//! assert_eq!(state.x, Some(Value::One));
//! assert_eq!(state.k, Some(1));
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod readiness;
pub mod server;
pub mod service;
pub mod session;
