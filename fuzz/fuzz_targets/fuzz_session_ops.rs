//! Fuzz target for arbitrary operation sequences on a node session.
//!
//! Faulty and killed nodes must never leak state, whatever order operations
//! arrive in.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quorum_node::session::NodeSession;
use quorum_types::{MessageRequest, NodeIdentity, Value};

#[derive(Debug, Arbitrary)]
enum Op {
    Message { sender: u8, bit: Option<bool> },
    Start,
    Stop,
}

#[derive(Debug, Arbitrary)]
struct Input {
    total_nodes: u8,
    faulty_count: u8,
    is_faulty: bool,
    initial_one: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let total_nodes = usize::from(input.total_nodes).max(1);
    let faulty_count = usize::from(input.faulty_count).min(total_nodes);
    let identity = if input.is_faulty {
        NodeIdentity::faulty(0, total_nodes, faulty_count)
    } else {
        let initial = if input.initial_one { Value::One } else { Value::Zero };
        NodeIdentity::correct(0, total_nodes, faulty_count, initial)
    };

    let mut session = NodeSession::new(&identity);
    let mut was_killed = false;

    for op in input.ops {
        match op {
            Op::Message { sender, bit } => {
                let value = match bit {
                    Some(true) => Value::One,
                    Some(false) => Value::Zero,
                    None => Value::Unknown,
                };
                let _ = session.receive(MessageRequest {
                    sender: usize::from(sender),
                    value,
                });
            }
            Op::Start => {
                let _ = session.attempt_decision(&identity);
            }
            Op::Stop => {
                session.halt();
            }
        }

        let report = session.report();
        assert!(!was_killed || report.killed);
        was_killed = report.killed;
        if identity.is_faulty || report.killed {
            assert!(report.x.is_none() && report.decided.is_none() && report.k.is_none());
        }
    }
});
