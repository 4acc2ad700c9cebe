//! Shared node capability interface
//!
//! Collaborators that store, sync or compose permissions work against
//! [`PermissionNode`] so that other node representations can be plugged in
//! later. [`Node`] is the only implementation in this crate.

use std::collections::BTreeMap;

use crate::error::{NodeError, Result};
use crate::node::Node;

/// Read-only view of a permission node plus its matching operations
///
/// ## Example
///
/// ```
/// use core_node::{Node, PermissionNode};
///
/// fn describe(node: &dyn PermissionNode) -> String {
///     format!("{} = {}", node.permission(), node.value())
/// }
///
/// let node = Node::from_serialized("essentials.fly", true).unwrap();
/// assert_eq!(describe(&node), "essentials.fly = true");
/// ```
pub trait PermissionNode: Send + Sync {
    /// The permission path
    fn permission(&self) -> &str;

    /// Grant (`true`) or negate (`false`)
    fn value(&self) -> bool;

    /// Attempt to change the value
    ///
    /// Nodes are immutable, so implementations must always fail.
    ///
    /// # Errors
    ///
    /// Always returns `NodeError::InvalidState`
    fn set_value(&mut self, value: bool) -> Result<bool> {
        let _ = value;
        Err(NodeError::InvalidState(
            "Nodes are immutable; build a new node instead".to_string(),
        ))
    }

    /// The server scope, if any
    fn server(&self) -> Option<&str>;

    /// The world scope, if any
    fn world(&self) -> Option<&str>;

    /// A snapshot of the extra contexts
    fn extra_contexts(&self) -> BTreeMap<String, String>;

    /// Expiry in unix seconds, `0` if permanent
    fn expiry_unix_time(&self) -> i64;

    /// Check if the node has an expiry
    fn is_temporary(&self) -> bool {
        self.expiry_unix_time() != 0
    }

    /// Check if the node is a `group.<name>` node
    fn is_group_node(&self) -> bool;

    /// See [`Node::group_name`]
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InvalidState` if this is not a group node
    fn group_name(&self) -> Result<&str>;

    /// Check if the permission ends with `.*`
    fn is_wildcard(&self) -> bool;

    /// Number of `.` characters in the permission
    fn wildcard_level(&self) -> usize;

    /// See [`Node::should_apply_on_server`]
    fn should_apply_on_server(
        &self,
        server: Option<&str>,
        include_global: bool,
        apply_regex: bool,
    ) -> bool;

    /// See [`Node::should_apply_on_world`]
    fn should_apply_on_world(
        &self,
        world: Option<&str>,
        include_global: bool,
        apply_regex: bool,
    ) -> bool;

    /// See [`Node::should_apply_with_context`]
    fn should_apply_with_context(&self, context: Option<&BTreeMap<String, String>>) -> bool;

    /// See [`Node::should_apply_on_any_servers`]
    fn should_apply_on_any_servers(&self, servers: &[String], include_global: bool) -> bool;

    /// See [`Node::should_apply_on_any_worlds`]
    fn should_apply_on_any_worlds(&self, worlds: &[String], include_global: bool) -> bool;

    /// See [`Node::resolve_wildcard`]
    fn resolve_wildcard(&self, possible_nodes: Option<&[String]>) -> Vec<String>;

    /// See [`Node::resolve_shorthand`]
    fn resolve_shorthand(&self) -> Vec<String>;

    /// See [`Node::almost_equals`]
    fn almost_equals(&self, other: &dyn PermissionNode) -> bool;

    /// Encode the node in the textual storage format
    fn to_serialized(&self) -> String;

    /// Lookup key of the node, the permission by default
    fn key(&self) -> &str {
        self.permission()
    }
}

impl PermissionNode for Node {
    fn permission(&self) -> &str {
        Node::permission(self)
    }

    fn value(&self) -> bool {
        Node::value(self)
    }

    fn server(&self) -> Option<&str> {
        Node::server(self)
    }

    fn world(&self) -> Option<&str> {
        Node::world(self)
    }

    fn extra_contexts(&self) -> BTreeMap<String, String> {
        Node::extra_contexts(self)
    }

    fn expiry_unix_time(&self) -> i64 {
        Node::expiry_unix_time(self)
    }

    fn is_group_node(&self) -> bool {
        Node::is_group_node(self)
    }

    fn group_name(&self) -> Result<&str> {
        Node::group_name(self)
    }

    fn is_wildcard(&self) -> bool {
        Node::is_wildcard(self)
    }

    fn wildcard_level(&self) -> usize {
        Node::wildcard_level(self)
    }

    fn should_apply_on_server(
        &self,
        server: Option<&str>,
        include_global: bool,
        apply_regex: bool,
    ) -> bool {
        Node::should_apply_on_server(self, server, include_global, apply_regex)
    }

    fn should_apply_on_world(
        &self,
        world: Option<&str>,
        include_global: bool,
        apply_regex: bool,
    ) -> bool {
        Node::should_apply_on_world(self, world, include_global, apply_regex)
    }

    fn should_apply_with_context(&self, context: Option<&BTreeMap<String, String>>) -> bool {
        Node::should_apply_with_context(self, context)
    }

    fn should_apply_on_any_servers(&self, servers: &[String], include_global: bool) -> bool {
        Node::should_apply_on_any_servers(self, servers, include_global)
    }

    fn should_apply_on_any_worlds(&self, worlds: &[String], include_global: bool) -> bool {
        Node::should_apply_on_any_worlds(self, worlds, include_global)
    }

    fn resolve_wildcard(&self, possible_nodes: Option<&[String]>) -> Vec<String> {
        Node::resolve_wildcard(self, possible_nodes)
    }

    fn resolve_shorthand(&self) -> Vec<String> {
        Node::resolve_shorthand(self)
    }

    fn almost_equals(&self, other: &dyn PermissionNode) -> bool {
        Node::almost_equals(self, other)
    }

    fn to_serialized(&self) -> String {
        Node::to_serialized(self)
    }
}
