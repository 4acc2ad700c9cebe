//! Fuzz target for shorthand and wildcard expansion
//!
//! Uses the bounded expansion so that hostile inputs cannot exhaust memory.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use core_node::NodeBuilder;

#[derive(Arbitrary, Debug)]
struct ExpansionInput {
    permission: String,
    candidates: Vec<String>,
}

fuzz_target!(|input: ExpansionInput| {
    if input.permission.len() > 1024 {
        return;
    }

    let Ok(node) = NodeBuilder::new(input.permission).build() else {
        return;
    };

    if let Ok(expanded) = node.resolve_shorthand_limited(4096) {
        assert!(expanded.len() <= 4096);
    }

    let resolved = node.resolve_wildcard(Some(&input.candidates[..]));
    assert!(resolved.len() <= input.candidates.len());
});
