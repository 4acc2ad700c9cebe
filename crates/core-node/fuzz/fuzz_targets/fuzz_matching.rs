//! Fuzz target for the scope and context matchers
//!
//! Arbitrary queries (including malformed `r=` regexes) must never panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use core_node::Node;
use std::collections::BTreeMap;

/// Structured input for scope matching
#[derive(Arbitrary, Debug)]
struct MatchInput {
    node: String,
    query: String,
    include_global: bool,
    apply_regex: bool,
    context: Vec<(String, String)>,
}

fuzz_target!(|input: MatchInput| {
    if input.node.len() > 4096 || input.query.len() > 4096 {
        return;
    }

    let Ok(node) = Node::from_serialized(&input.node, true) else {
        return;
    };

    let _ = node.should_apply_on_server(Some(&input.query), input.include_global, input.apply_regex);
    let _ = node.should_apply_on_world(Some(&input.query), input.include_global, input.apply_regex);
    let _ = node.should_apply_on_any_servers(&[input.query.as_str()], input.include_global);

    let context: BTreeMap<String, String> = input.context.into_iter().collect();
    let _ = node.should_apply_with_context(Some(&context));

    // Absent queries always apply
    assert!(node.should_apply_on_server(None, input.include_global, input.apply_regex));
    assert!(node.should_apply_on_world(None, input.include_global, input.apply_regex));
});
