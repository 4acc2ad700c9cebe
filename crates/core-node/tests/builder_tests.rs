//! Integration tests for NodeBuilder and the textual decoder

use core_node::{Node, NodeBuilder, NodeError};

#[test]
fn test_node_builder_defaults() {
    let node = NodeBuilder::new("essentials.fly").build().unwrap();

    assert_eq!(node.permission(), "essentials.fly");
    assert!(node.value());
    assert!(node.is_permanent());
    assert_eq!(node.server(), None);
    assert_eq!(node.world(), None);
    assert!(node.extra_contexts().is_empty());
}

#[test]
fn test_node_builder_all_fields() {
    let node = NodeBuilder::new("essentials.fly")
        .server("survival")
        .unwrap()
        .world("nether")
        .expires_at(1_999_999_999)
        .negated(true)
        .with_extra_context("region", "spawn")
        .build()
        .unwrap();

    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.world(), Some("nether"));
    assert_eq!(node.expiry_unix_time(), 1_999_999_999);
    assert!(node.is_negated());
    assert_eq!(node.extra_context("region"), Some("spawn"));
}

#[test]
fn test_negated_and_value_are_inverse() {
    assert!(!NodeBuilder::new("a").negated(true).build().unwrap().value());
    assert!(NodeBuilder::new("a").negated(false).build().unwrap().value());
    assert!(!NodeBuilder::new("a").value(false).build().unwrap().value());
}

#[test]
fn test_extra_context_overwrites() {
    let node = NodeBuilder::new("a")
        .with_extra_context("k", "1")
        .with_extra_context("k", "2")
        .build()
        .unwrap();
    assert_eq!(node.extra_context("k"), Some("2"));
    assert_eq!(node.extra_contexts().len(), 1);
}

#[test]
fn test_server_validation() {
    for bad in ["a/b", "a-b", "a$b", "(a|b)", "r=.*", "two words", ""] {
        let result = NodeBuilder::new("a").server(bad);
        assert!(
            matches!(result, Err(NodeError::InvalidArgument(_))),
            "server {bad:?} should be rejected"
        );
    }
}

#[test]
fn test_server_raw_skips_validation() {
    let node = NodeBuilder::new("a").server_raw("odd$name").build().unwrap();
    assert_eq!(node.server(), Some("odd$name"));
}

#[test]
fn test_builder_empty_permission_fails() {
    assert!(matches!(
        NodeBuilder::new("").build(),
        Err(NodeError::InvalidArgument(_))
    ));
}

#[test]
fn test_context_prefix_parsing() {
    let node = NodeBuilder::with_context_prefix("(region=spawn,mode=pvp)build.place")
        .build()
        .unwrap();
    assert_eq!(node.permission(), "build.place");
    assert_eq!(node.extra_context("region"), Some("spawn"));
    assert_eq!(node.extra_context("mode"), Some("pvp"));
}

#[test]
fn test_context_prefix_skips_malformed_pairs() {
    let node = NodeBuilder::with_context_prefix("(region=spawn,broken,x=)build.place")
        .build()
        .unwrap();
    assert_eq!(node.permission(), "build.place");
    assert_eq!(node.extra_contexts().len(), 2);
    assert_eq!(node.extra_context("region"), Some("spawn"));
    assert_eq!(node.extra_context("x"), Some(""));
    assert_eq!(node.extra_context("broken"), None);
}

#[test]
fn test_context_value_splits_at_first_equals() {
    let node = NodeBuilder::with_context_prefix("(expr=a=b)perm").build().unwrap();
    assert_eq!(node.extra_context("expr"), Some("a=b"));
}

#[test]
fn test_context_prefix_ignored_without_pairs() {
    // A leading shorthand group is not a context block
    let node = NodeBuilder::with_context_prefix("(a|b).c").build().unwrap();
    assert_eq!(node.permission(), "(a|b).c");
    assert!(node.extra_contexts().is_empty());
}

#[test]
fn test_plain_constructor_does_not_parse_contexts() {
    let node = NodeBuilder::new("(region=spawn)build").build().unwrap();
    assert_eq!(node.permission(), "(region=spawn)build");
    assert!(node.extra_contexts().is_empty());
}

#[test]
fn test_context_block_with_empty_remainder_fails() {
    let result = NodeBuilder::with_context_prefix("(region=spawn)").build();
    assert!(matches!(result, Err(NodeError::InvalidArgument(_))));
}

// ===== Decoding =====

#[test]
fn test_decode_bare() {
    let node = Node::from_serialized("foo.bar", true).unwrap();
    assert_eq!(node.permission(), "foo.bar");
    assert!(node.value());
    assert!(!node.is_server_specific());
    assert!(node.is_permanent());
}

#[test]
fn test_decode_expiry_only() {
    let node = Node::from_serialized("foo.bar$1999999999", false).unwrap();
    assert_eq!(node.permission(), "foo.bar");
    assert_eq!(node.expiry_unix_time(), 1_999_999_999);
    assert!(node.is_negated());
    assert!(!node.is_server_specific());
}

#[test]
fn test_decode_server() {
    let node = Node::from_serialized("survival/essentials.fly", true).unwrap();
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.world(), None);
    assert!(node.is_permanent());
}

#[test]
fn test_decode_server_expiry() {
    let node = Node::from_serialized("survival/essentials.fly$42", true).unwrap();
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.expiry_unix_time(), 42);
}

#[test]
fn test_decode_server_world() {
    let node = Node::from_serialized("survival-nether/essentials.fly", true).unwrap();
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.world(), Some("nether"));
    assert!(node.is_permanent());
}

#[test]
fn test_decode_server_world_expiry() {
    let node = Node::from_serialized("survival-nether/essentials.fly$1999999999", true).unwrap();
    assert_eq!(node.permission(), "essentials.fly");
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.world(), Some("nether"));
    assert_eq!(node.expiry_unix_time(), 1_999_999_999);
}

#[test]
fn test_decode_world_splits_at_first_dash() {
    let node = Node::from_serialized("survival-the-end/a.b", true).unwrap();
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.world(), Some("the-end"));
}

#[test]
fn test_decode_global_scope_collapses() {
    let node = Node::from_serialized("global/a.b", true).unwrap();
    assert_eq!(node.server(), None);

    let node = Node::from_serialized("global-nether/a.b", true).unwrap();
    assert_eq!(node.server(), Some("global"));
    assert_eq!(node.world(), Some("nether"));
}

#[test]
fn test_decode_with_contexts() {
    let node = Node::from_serialized("survival/(region=spawn)build.place$77", true).unwrap();
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.permission(), "build.place");
    assert_eq!(node.extra_context("region"), Some("spawn"));
    assert_eq!(node.expiry_unix_time(), 77);
}

#[test]
fn test_decode_slash_in_permission_after_scope() {
    let node = Node::from_serialized("survival/a/b", true).unwrap();
    assert_eq!(node.server(), Some("survival"));
    assert_eq!(node.permission(), "a/b");
}

#[test]
fn test_decode_invalid_expiry() {
    for input in ["a.b$soon", "s/a.b$12x", "s-w/a.b$", "a.b$1$2"] {
        let result = Node::from_serialized(input, true);
        assert!(
            matches!(result, Err(NodeError::InvalidExpiry { .. })),
            "{input:?} should fail with InvalidExpiry, got {result:?}"
        );
    }
}

#[test]
fn test_decode_empty_permission_fails() {
    for input in ["", "survival/", "survival-nether/", "$5", "s/$5", "(a=b)", "s/(a=b)$5"] {
        let result = Node::from_serialized(input, true);
        assert!(
            matches!(result, Err(NodeError::InvalidArgument(_))),
            "{input:?} should fail with InvalidArgument, got {result:?}"
        );
    }
}

#[test]
fn test_decode_returns_builder() {
    let node = NodeBuilder::from_serialized("survival/essentials.fly", true)
        .unwrap()
        .with_extra_context("region", "spawn")
        .build()
        .unwrap();
    assert_eq!(node.extra_context("region"), Some("spawn"));
}
