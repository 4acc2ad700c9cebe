//! Builder for ergonomic, validated node construction
//!
//! Also home of the textual decoder, which turns an encoded node back into a
//! builder ([`NodeBuilder::from_serialized`]).

use std::collections::BTreeMap;

use tracing::{instrument, Level};

use crate::error::{NodeError, Result};
use crate::node::Node;
use crate::patterns::{
    self, CONTEXT_ASSIGN, CONTEXT_SEPARATOR, SERVER_DELIMITER, TEMP_DELIMITER, WORLD_DELIMITER,
};
use crate::MAX_SERVER_NAME_LENGTH;

/// Characters that cannot appear in a server name set through
/// [`NodeBuilder::server`]
pub const RESERVED_SERVER_CHARS: &[char] = &['/', '-', '$', '(', ')', '|', '=', ','];

/// Check if `server` can be stored as a server scope without breaking the
/// textual encoding
#[must_use]
pub fn is_valid_server_name(server: &str) -> bool {
    !server.is_empty()
        && server.chars().count() <= MAX_SERVER_NAME_LENGTH
        && !server
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_SERVER_CHARS.contains(&c))
}

/// Builder for creating [`Node`] instances with a fluent API
///
/// # Examples
///
/// ```
/// use core_node::NodeBuilder;
///
/// # fn example() -> Result<(), core_node::NodeError> {
/// // Plain node
/// let node = NodeBuilder::new("essentials.fly").build()?;
/// assert!(node.value());
///
/// // Scoped, temporary, negated
/// let node = NodeBuilder::new("essentials.fly")
///     .server("survival")?
///     .world("nether")
///     .expires_at(1_999_999_999)
///     .negated(true)
///     .build()?;
/// assert_eq!(node.to_serialized(), "survival-nether/essentials.fly$1999999999");
///
/// // Inline context block
/// let node = NodeBuilder::with_context_prefix("(region=spawn)build.place").build()?;
/// assert_eq!(node.extra_context("region"), Some("spawn"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    permission: String,
    value: bool,
    server: Option<String>,
    world: Option<String>,
    expire_at: i64,
    extra_contexts: BTreeMap<String, String>,
}

impl NodeBuilder {
    /// Create a builder for `permission`, taken verbatim
    #[must_use]
    pub fn new(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            value: true,
            server: None,
            world: None,
            expire_at: 0,
            extra_contexts: BTreeMap::new(),
        }
    }

    /// Create a builder, splitting off a leading `(key=value,...)` block
    ///
    /// Pairs without `=` are skipped. When the input has no such block the
    /// whole string is the permission.
    #[must_use]
    pub fn with_context_prefix(permission: impl Into<String>) -> Self {
        let permission = permission.into();
        if !patterns::node_contexts().is_match(&permission) {
            return Self::new(permission);
        }

        // The detector guarantees a leading '(' and a closing ')'.
        let Some((block, rest)) = permission
            .strip_prefix('(')
            .and_then(|s| s.split_once(')'))
        else {
            return Self::new(permission);
        };

        let mut builder = Self::new(rest);
        for pair in block.split(CONTEXT_SEPARATOR) {
            match pair.split_once(CONTEXT_ASSIGN) {
                Some((key, value)) => {
                    builder.extra_contexts.insert(key.to_string(), value.to_string());
                }
                None => tracing::debug!(pair, "skipping malformed context pair"),
            }
        }
        builder
    }

    /// Decode an encoded node into a builder
    ///
    /// The encoding is `[server[-world]/][(k=v,...)]permission[$expiry]`.
    /// The scope is split at the first `/`, server and world at the first
    /// `-`, and the expiry at the first `$` after the scope.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InvalidExpiry` if the expiry is not an integer
    #[instrument(level = Level::TRACE)]
    pub fn from_serialized(s: &str, value: bool) -> Result<Self> {
        let (scope, rest) = match s.split_once(SERVER_DELIMITER) {
            Some((scope, rest)) => (Some(scope), rest),
            None => (None, s),
        };

        let (permission, expiry) = match rest.split_once(TEMP_DELIMITER) {
            Some((permission, expiry)) => (permission, Some(parse_expiry(expiry)?)),
            None => (rest, None),
        };

        let mut builder = Self::with_context_prefix(permission);

        if let Some(scope) = scope {
            builder = match scope.split_once(WORLD_DELIMITER) {
                Some((server, world)) => builder.server_raw(server).world(world),
                None => builder.server_raw(scope),
            };
        }

        if let Some(expiry) = expiry {
            builder = builder.expires_at(expiry);
        }

        Ok(builder.value(value))
    }

    /// Set the value to the inverse of `negated`
    #[must_use]
    pub const fn negated(mut self, negated: bool) -> Self {
        self.value = !negated;
        self
    }

    /// Set the value (`true` grants)
    #[must_use]
    pub const fn value(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    /// Set the expiry timestamp (unix seconds, `0` for permanent)
    #[must_use]
    pub const fn expires_at(mut self, expire_at: i64) -> Self {
        self.expire_at = expire_at;
        self
    }

    /// Set the world scope
    #[must_use]
    pub fn world(mut self, world: impl Into<String>) -> Self {
        self.world = Some(world.into());
        self
    }

    /// Set the server scope after checking [`is_valid_server_name`]
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InvalidArgument` if the name is not valid
    pub fn server(mut self, server: impl Into<String>) -> Result<Self> {
        let server = server.into();
        if !is_valid_server_name(&server) {
            return Err(NodeError::InvalidArgument(format!(
                "Server name invalid: {server:?}"
            )));
        }
        self.server = Some(server);
        Ok(self)
    }

    /// Set the server scope without validation
    #[must_use]
    pub fn server_raw(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Add (or overwrite) an extra context
    #[must_use]
    pub fn with_extra_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_contexts.insert(key.into(), value.into());
        self
    }

    /// Build the [`Node`]
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InvalidArgument` if the permission is empty
    pub fn build(self) -> Result<Node> {
        Node::new(
            self.permission,
            self.value,
            self.expire_at,
            self.server,
            self.world,
            self.extra_contexts,
        )
    }
}

fn parse_expiry(raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|source| NodeError::InvalidExpiry {
        value: raw.to_string(),
        source,
    })
}
