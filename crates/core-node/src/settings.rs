//! Matching configuration and single-node evaluation
//!
//! [`MatchSettings`] carries the switches a host usually reads from its
//! configuration file; [`Query`] describes the context a permission check is
//! made in. [`Node::applies_to`] combines the individual matching predicates
//! into one answer for one node. Ranking several applicable nodes against each
//! other is left to the caller.
//!
//! ```
//! use core_node::{MatchSettings, Node, Query};
//!
//! let settings = MatchSettings::from_toml(r#"
//! include_global = true
//! apply_regex = true
//! "#).unwrap();
//!
//! let node = Node::from_serialized("survival/essentials.fly", true).unwrap();
//! let query = Query::new().server("r=surv.*").at(1_700_000_000);
//! assert!(node.applies_to(&query, &settings));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, Result};
use crate::node::{unix_now, Node};
use crate::MAX_SHORTHAND_EXPANSION;

/// Switches controlling how nodes are matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Nodes without a server apply on every server
    pub include_global: bool,
    /// Nodes without a world apply on every world
    pub include_global_world: bool,
    /// Honour `r=<regex>` server and world queries
    pub apply_regex: bool,
    /// Expand `(a|b)` shorthand nodes
    pub apply_shorthand: bool,
    /// Largest shorthand expansion accepted by [`Node::expand_with`]
    pub max_shorthand_expansion: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            include_global: true,
            include_global_world: true,
            apply_regex: true,
            apply_shorthand: true,
            max_shorthand_expansion: MAX_SHORTHAND_EXPANSION,
        }
    }
}

impl MatchSettings {
    /// Load settings from a TOML string; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Toml` if the TOML is malformed
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize settings to a TOML string
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Serialization` if TOML serialization fails
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| NodeError::Serialization(e.to_string()))
    }
}

/// The context a permission check is made in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    server: Option<String>,
    world: Option<String>,
    context: BTreeMap<String, String>,
    now: Option<i64>,
}

impl Query {
    /// An empty query: every scope and context check passes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a server (plain name, `(a|b)` or `r=<regex>`)
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Restrict to a world (plain name, `(a|b)` or `r=<regex>`)
    #[must_use]
    pub fn world(mut self, world: impl Into<String>) -> Self {
        self.world = Some(world.into());
        self
    }

    /// Require an extra context value
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Evaluate expiry at `now` (unix seconds) instead of the system clock
    #[must_use]
    pub const fn at(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> i64 {
        self.now.unwrap_or_else(unix_now)
    }
}

impl Node {
    /// Check if this node applies in `query`
    ///
    /// Temporary nodes past their expiry never apply; otherwise the server,
    /// world and context checks must all pass.
    #[must_use]
    pub fn applies_to(&self, query: &Query, settings: &MatchSettings) -> bool {
        if self.is_temporary() && self.has_expired_at(query.now()) {
            return false;
        }

        self.should_apply_on_server(
            query.server.as_deref(),
            settings.include_global,
            settings.apply_regex,
        ) && self.should_apply_on_world(
            query.world.as_deref(),
            settings.include_global_world,
            settings.apply_regex,
        ) && self.should_apply_with_context(Some(&query.context))
    }

    /// The concrete permissions this node stands for under `settings`
    ///
    /// A shorthand node expands to its alternatives when shorthand is enabled;
    /// anything else stands for its own permission.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::ExpansionTooLarge` if the expansion exceeds
    /// `settings.max_shorthand_expansion`
    pub fn expand_with(&self, settings: &MatchSettings) -> Result<Vec<String>> {
        if settings.apply_shorthand {
            let expanded = self.resolve_shorthand_limited(settings.max_shorthand_expansion)?;
            if !expanded.is_empty() {
                return Ok(expanded);
            }
        }
        Ok(vec![self.permission().to_string()])
    }
}
