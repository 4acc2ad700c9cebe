//! The immutable permission node value
//!
//! A [`Node`] is one permission rule: a dotted permission path, a grant or
//! negate value, an optional expiry and optional scoping (server, world and
//! arbitrary extra contexts). Nodes are built once, through [`Node::new`] or a
//! [`NodeBuilder`](crate::builder::NodeBuilder), and never change afterwards.
//!
//! ## Textual encoding
//!
//! ```text
//! [server[-world]/][(key=value,...)]permission[$expiry]
//! ```
//!
//! - `survival/essentials.fly` - server scoped
//! - `survival-nether/essentials.fly$1999999999` - world scoped, temporary
//! - `(region=spawn)build.place` - extra context

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, Result};
use crate::matching::eq_ignore_case;
use crate::patterns::{
    self, CONTEXT_ASSIGN, CONTEXT_SEPARATOR, SERVER_DELIMITER, TEMP_DELIMITER, WORLD_DELIMITER,
};

/// The scope name that means "applies everywhere"
pub const GLOBAL_SCOPE: &str = "global";

/// Prefix shared by every group node
pub const GROUP_PREFIX: &str = "group.";

/// Suffix marking a wildcard node
pub const WILDCARD_SUFFIX: &str = ".*";

/// An immutable permission node
///
/// # Example
///
/// ```
/// use core_node::Node;
///
/// let node = Node::from_serialized("survival-nether/essentials.fly$1999999999", true).unwrap();
/// assert_eq!(node.permission(), "essentials.fly");
/// assert_eq!(node.server(), Some("survival"));
/// assert_eq!(node.world(), Some("nether"));
/// assert!(node.is_temporary());
/// assert_eq!(node.to_serialized(), "survival-nether/essentials.fly$1999999999");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    permission: String,
    value: bool,
    expire_at: i64,
    server: Option<String>,
    world: Option<String>,
    extra_contexts: BTreeMap<String, String>,
}

impl Node {
    /// Make an immutable node
    ///
    /// * `permission` - the dotted permission path, must not be empty
    /// * `value` - `true` grants, `false` negates
    /// * `expire_at` - unix seconds, `0` for a permanent node
    /// * `server` - `"global"` (any case) or `""` mean no server
    /// * `world` - `""` means no world; a world without a server is scoped to `"global"`
    /// * `extra_contexts` - additional key/value constraints
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InvalidArgument` if `permission` is empty
    pub fn new(
        permission: impl Into<String>,
        value: bool,
        expire_at: i64,
        server: Option<String>,
        world: Option<String>,
        extra_contexts: BTreeMap<String, String>,
    ) -> Result<Self> {
        let permission = permission.into();
        if permission.is_empty() {
            return Err(NodeError::InvalidArgument("Empty permission".to_string()));
        }

        let mut server = server.filter(|s| !s.is_empty() && !eq_ignore_case(s, GLOBAL_SCOPE));
        let world = world.filter(|w| !w.is_empty());

        if world.is_some() && server.is_none() {
            server = Some(GLOBAL_SCOPE.to_string());
        }

        Ok(Self {
            permission,
            value,
            expire_at,
            server,
            world,
            extra_contexts,
        })
    }

    /// Decode a node from its textual encoding
    ///
    /// # Errors
    ///
    /// See [`NodeBuilder::from_serialized`](crate::builder::NodeBuilder::from_serialized)
    /// and [`Node::new`].
    pub fn from_serialized(s: &str, value: bool) -> Result<Self> {
        crate::builder::NodeBuilder::from_serialized(s, value)?.build()
    }

    // ===== Accessors =====

    /// The permission path
    #[must_use]
    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Alias of [`Node::permission`], used as the lookup key by node collections
    #[must_use]
    pub fn key(&self) -> &str {
        &self.permission
    }

    /// `true` if the node grants, `false` if it negates
    #[must_use]
    pub const fn value(&self) -> bool {
        self.value
    }

    /// The server this node is scoped to
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// The world this node is scoped to
    #[must_use]
    pub fn world(&self) -> Option<&str> {
        self.world.as_deref()
    }

    /// A snapshot of the extra contexts
    ///
    /// The returned map is a copy; changing it does not affect the node.
    #[must_use]
    pub fn extra_contexts(&self) -> BTreeMap<String, String> {
        self.extra_contexts.clone()
    }

    /// Look up one extra context value without copying the whole map
    #[must_use]
    pub fn extra_context(&self, key: &str) -> Option<&str> {
        self.extra_contexts.get(key).map(String::as_str)
    }

    pub(crate) fn extra_contexts_ref(&self) -> &BTreeMap<String, String> {
        &self.extra_contexts
    }

    /// Raw expiry timestamp in unix seconds, `0` for permanent nodes
    #[must_use]
    pub const fn expiry_unix_time(&self) -> i64 {
        self.expire_at
    }

    /// Expiry as a `SystemTime`, or `None` for permanent nodes
    #[must_use]
    pub fn expiry(&self) -> Option<SystemTime> {
        if self.is_permanent() {
            return None;
        }
        let offset = Duration::from_secs(self.expire_at.unsigned_abs());
        if self.expire_at > 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }

    // ===== Derived predicates =====

    /// Inverse of [`Node::value`]
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        !self.value
    }

    /// Check if the node is scoped to a server (including `"global"` for world-only nodes)
    #[must_use]
    pub const fn is_server_specific(&self) -> bool {
        self.server.is_some()
    }

    /// Check if the node is scoped to a world
    #[must_use]
    pub const fn is_world_specific(&self) -> bool {
        self.world.is_some()
    }

    /// Check if the node has an expiry
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.expire_at != 0
    }

    /// Check if the node never expires
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !self.is_temporary()
    }

    /// Check if this node has expired
    ///
    /// A node is still valid during its exact expiry second. The check is a
    /// plain timestamp comparison, so a permanent node (`expire_at == 0`)
    /// reports `true`; pair it with [`Node::is_temporary`].
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.has_expired_at(unix_now())
    }

    /// Check if this node has expired at `now` (unix seconds)
    #[must_use]
    pub const fn has_expired_at(&self, now: i64) -> bool {
        self.expire_at < now
    }

    /// Seconds until expiry; negative once expired
    #[must_use]
    pub fn seconds_til_expiry(&self) -> i64 {
        self.seconds_til_expiry_at(unix_now())
    }

    /// Seconds between `now` (unix seconds) and the expiry
    #[must_use]
    pub const fn seconds_til_expiry_at(&self, now: i64) -> i64 {
        self.expire_at.saturating_sub(now)
    }

    /// Check if the permission ends with `.*`
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.permission.ends_with(WILDCARD_SUFFIX)
    }

    /// Check if the whole permission has the `group.<name>` shape
    #[must_use]
    pub fn is_group_node(&self) -> bool {
        patterns::group_match().is_match(&self.permission)
    }

    /// The group name of a group node
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InvalidState` if this is not a group node
    pub fn group_name(&self) -> Result<&str> {
        if !self.is_group_node() {
            return Err(NodeError::InvalidState(
                "This is not a group node".to_string(),
            ));
        }
        Ok(&self.permission[GROUP_PREFIX.len()..])
    }

    /// Number of `.` characters in the permission
    #[must_use]
    pub fn wildcard_level(&self) -> usize {
        self.permission.matches(patterns::DOT).count()
    }

    // ===== Serialization =====

    /// Encode this node in the textual storage format
    #[must_use]
    pub fn to_serialized(&self) -> String {
        let mut out = String::with_capacity(self.permission.len() + 16);

        match (&self.server, &self.world) {
            (Some(server), world) => {
                out.push_str(server);
                if let Some(world) = world {
                    out.push(WORLD_DELIMITER);
                    out.push_str(world);
                }
                out.push(SERVER_DELIMITER);
            }
            (None, Some(world)) => {
                out.push_str(GLOBAL_SCOPE);
                out.push(WORLD_DELIMITER);
                out.push_str(world);
                out.push(SERVER_DELIMITER);
            }
            (None, None) => {}
        }

        if !self.extra_contexts.is_empty() {
            out.push('(');
            for (i, (key, value)) in self.extra_contexts.iter().enumerate() {
                if i > 0 {
                    out.push(CONTEXT_SEPARATOR);
                }
                out.push_str(key);
                out.push(CONTEXT_ASSIGN);
                out.push_str(value);
            }
            out.push(')');
        }

        out.push_str(&self.permission);

        if self.is_temporary() {
            out.push(TEMP_DELIMITER);
            out.push_str(&self.expire_at.to_string());
        }

        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_serialized())
    }
}

/// Storage record for a node: its encoding plus its value
///
/// Deserializing a [`Node`] always goes through this record and the textual
/// decoder, so stored nodes get the same validation as parsed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Encoded node, see [`Node::to_serialized`]
    pub node: String,
    /// Grant (`true`) or negate (`false`)
    #[serde(default = "default_value")]
    pub value: bool,
}

fn default_value() -> bool {
    true
}

impl TryFrom<NodeRecord> for Node {
    type Error = NodeError;

    fn try_from(record: NodeRecord) -> Result<Self> {
        Self::from_serialized(&record.node, record.value)
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            node: node.to_serialized(),
            value: node.value,
        }
    }
}

/// Current unix time in seconds
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
