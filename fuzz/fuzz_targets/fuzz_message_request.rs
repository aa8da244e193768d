//! Fuzz target for `/message` body parsing.
//!
//! Parsing must never panic, and anything accepted must re-encode to an
//! equivalent request.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quorum_types::{MessageRequest, Value};

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_json::from_slice::<MessageRequest>(data) {
        let encoded = serde_json::to_vec(&request).expect("encoding a parsed request");
        let decoded: MessageRequest =
            serde_json::from_slice(&encoded).expect("decoding an encoded request");
        assert_eq!(request, decoded);
    }

    let _ = serde_json::from_slice::<Value>(data);
});
