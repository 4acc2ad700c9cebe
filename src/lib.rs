// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 P47H Team <https://p47h.com>

//! # permnode
//!
//! Permission nodes: a compact textual encoding of access-control rules,
//! an immutable value type and a matching engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use permnode::node::{Node, NodeBuilder};
//!
//! let node = NodeBuilder::new("essentials.(fly|heal)")
//!     .server("survival")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert!(node.should_apply_on_server(Some("SURVIVAL"), false, false));
//! assert_eq!(node.resolve_shorthand().len(), 2);
//! assert_eq!(Node::from_serialized(&node.to_serialized(), true).unwrap(), node);
//! ```
//!
//! ## Architecture
//!
//! This facade crate re-exports:
//!
//! - [`node`] - node value, builder and matching engine (from `core-node`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Permission node module.
///
/// Re-exports `core_node`.
pub mod node {
    pub use core_node::*;
}

// Convenience re-exports at root level
pub use core_node::{MatchSettings, Node, NodeBuilder, NodeError, PermissionNode, Query};
