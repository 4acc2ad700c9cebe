// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 P47H Team <https://p47h.com>

//! # core-node
//!
//! Permission node representation and matching engine.
//!
//! This crate provides:
//! - [`Node`]: one immutable permission rule with optional server / world /
//!   context scoping and expiry
//! - [`NodeBuilder`]: validated construction and decoding of the textual
//!   storage format
//! - Matching: server, world and context applicability, wildcard and
//!   shorthand expansion
//! - [`MatchSettings`] / [`Query`]: configuration and single-node evaluation
//!
//! ## Textual encoding
//!
//! ```text
//! [server[-world]/][(key=value,...)]permission[$expiry]
//! ```
//!
//! ```
//! use core_node::Node;
//!
//! let node = Node::from_serialized("(region=spawn)build.place$1999999999", false).unwrap();
//! assert!(node.is_negated());
//! assert!(node.is_temporary());
//! assert_eq!(node.to_serialized(), "(region=spawn)build.place$1999999999");
//! ```
//!
//! ## Security
//!
//! - Matching never fails: malformed or hostile `r=` regex queries are
//!   treated as "no match", and compiled regex size is capped
//! - Shorthand expansion is exponential in the number of alternation
//!   segments; use [`Node::resolve_shorthand_limited`] (bounded by
//!   `MAX_SHORTHAND_EXPANSION` by default) for untrusted input

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod builder;
pub mod error;
pub mod matching;
pub mod node;
pub mod patterns;
pub mod settings;

pub use api::PermissionNode;
pub use builder::{is_valid_server_name, NodeBuilder};
/// Re-export commonly used types
pub use error::{NodeError, Result};
pub use node::{Node, NodeRecord, GLOBAL_SCOPE};
pub use settings::{MatchSettings, Query};

/// Maximum length of a server name accepted by [`NodeBuilder::server`]
pub const MAX_SERVER_NAME_LENGTH: usize = 36;

/// Default bound on shorthand expansion size (DoS mitigation)
pub const MAX_SHORTHAND_EXPANSION: usize = 1024;
