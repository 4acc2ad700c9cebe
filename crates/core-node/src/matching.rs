//! Applicability checks and wildcard / shorthand expansion.
//!
//! Every predicate here is total: malformed queries (including invalid
//! `r=` regexes) answer `false` or an empty expansion, never an error.
//!
//! ## Query syntax for servers and worlds
//!
//! - `survival` - case-insensitive equality
//! - `(survival|creative)` - any alternative, case-insensitive
//! - `r=surv.*` - whole-name regex, only when regex matching is enabled

use std::collections::{BTreeMap, BTreeSet};

use crate::api::PermissionNode;
use crate::error::{NodeError, Result};
use crate::node::{Node, WILDCARD_SUFFIX};
use crate::patterns::{self, DOT, VERTICAL_BAR};

/// Prefix of a regex scope query
pub const REGEX_QUERY_PREFIX: &str = "r=";

impl Node {
    /// Check if this node applies on the given server
    ///
    /// An absent or empty query always applies. A node without a server
    /// applies only when `include_global` is set.
    #[must_use]
    pub fn should_apply_on_server(
        &self,
        server: Option<&str>,
        include_global: bool,
        apply_regex: bool,
    ) -> bool {
        scope_applies(self.server(), server, include_global, apply_regex)
    }

    /// Check if this node applies on the given world
    ///
    /// Same rules as [`Node::should_apply_on_server`], over the world scope.
    #[must_use]
    pub fn should_apply_on_world(
        &self,
        world: Option<&str>,
        include_global: bool,
        apply_regex: bool,
    ) -> bool {
        scope_applies(self.world(), world, include_global, apply_regex)
    }

    /// Check if this node applies on any of the given servers
    ///
    /// Regex queries are never honoured here.
    #[must_use]
    pub fn should_apply_on_any_servers<S: AsRef<str>>(
        &self,
        servers: &[S],
        include_global: bool,
    ) -> bool {
        servers
            .iter()
            .any(|s| self.should_apply_on_server(Some(s.as_ref()), include_global, false))
    }

    /// Check if this node applies on any of the given worlds
    ///
    /// Regex queries are never honoured here.
    #[must_use]
    pub fn should_apply_on_any_worlds<S: AsRef<str>>(
        &self,
        worlds: &[S],
        include_global: bool,
    ) -> bool {
        worlds
            .iter()
            .any(|w| self.should_apply_on_world(Some(w.as_ref()), include_global, false))
    }

    /// Check if every key of `context` is present in this node's extra
    /// contexts with a case-insensitively equal value
    ///
    /// Extra contexts of the node that the query does not mention are ignored.
    #[must_use]
    pub fn should_apply_with_context(&self, context: Option<&BTreeMap<String, String>>) -> bool {
        let Some(context) = context else {
            return true;
        };

        context.iter().all(|(key, value)| {
            self.extra_contexts_ref()
                .get(key)
                .is_some_and(|own| eq_ignore_case(own, value))
        })
    }

    /// Loose comparison used when replacing nodes in a collection
    ///
    /// The permissions must be equal ignoring case, the extra contexts and
    /// the temporary flag must be equal. For server and world the check only
    /// passes when presence differs between the two nodes and, if `other`
    /// carries the scope, it equals ours ignoring case; nodes with the same
    /// presence never compare as almost equal.
    #[must_use]
    pub fn almost_equals(&self, other: &dyn PermissionNode) -> bool {
        if !eq_ignore_case(other.permission(), self.permission()) {
            return false;
        }

        if !presence_differs_compatibly(other.server(), self.server()) {
            return false;
        }

        if !presence_differs_compatibly(other.world(), self.world()) {
            return false;
        }

        if &other.extra_contexts() != self.extra_contexts_ref() {
            return false;
        }

        other.is_temporary() == self.is_temporary()
    }

    /// Resolve a wildcard node against known permissions
    ///
    /// Returns every candidate that starts with this node's permission minus
    /// the trailing `.*`, in input order. Non-wildcard nodes and absent
    /// candidates resolve to nothing.
    #[must_use]
    pub fn resolve_wildcard<S: AsRef<str>>(&self, possible_nodes: Option<&[S]>) -> Vec<String> {
        let Some(possible_nodes) = possible_nodes else {
            return Vec::new();
        };
        let Some(prefix) = self.permission().strip_suffix(WILDCARD_SUFFIX) else {
            return Vec::new();
        };

        possible_nodes
            .iter()
            .map(AsRef::as_ref)
            .filter(|candidate| candidate.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }

    /// Expand a shorthand node such as `essentials.(fly|heal)`
    ///
    /// Each dot-separated segment written as `(a|b|...)` contributes its
    /// alternatives; the result is the Cartesian product of all segments.
    /// The output is de-duplicated and its order is not part of the contract.
    ///
    /// Cost is the product of the alternative counts, so callers handling
    /// untrusted permissions should prefer [`Node::resolve_shorthand_limited`].
    #[must_use]
    pub fn resolve_shorthand(&self) -> Vec<String> {
        let Some(segments) = self.shorthand_segments() else {
            return Vec::new();
        };
        expand(&segments)
    }

    /// Like [`Node::resolve_shorthand`], refusing expansions larger than `max`
    ///
    /// # Errors
    ///
    /// Returns `NodeError::ExpansionTooLarge` when the product of the
    /// alternative counts exceeds `max`
    pub fn resolve_shorthand_limited(&self, max: usize) -> Result<Vec<String>> {
        let Some(segments) = self.shorthand_segments() else {
            return Ok(Vec::new());
        };

        let attempted = segments
            .iter()
            .filter(|set| !set.is_empty())
            .try_fold(1usize, |acc, set| acc.checked_mul(set.len()))
            .unwrap_or(usize::MAX);

        if attempted > max {
            return Err(NodeError::ExpansionTooLarge { max, attempted });
        }

        Ok(expand(&segments))
    }

    fn shorthand_segments(&self) -> Option<Vec<BTreeSet<&str>>> {
        let permission = self.permission();
        if !patterns::shorthand_node().is_match(permission) || !permission.contains(DOT) {
            return None;
        }

        let segments = patterns::split_trimmed(permission, DOT)
            .into_iter()
            .map(|segment| match alternation(segment) {
                Some(inner) => patterns::split_trimmed(inner, VERTICAL_BAR)
                    .into_iter()
                    .collect(),
                None => BTreeSet::from([segment]),
            })
            .collect();

        Some(segments)
    }
}

/// Cartesian product of the segment sets, joined with `.`
///
/// An empty segment set clears the product; the next segment starts over.
fn expand(segments: &[BTreeSet<&str>]) -> Vec<String> {
    let mut nodes: BTreeSet<String> = BTreeSet::new();

    for set in segments {
        nodes = if nodes.is_empty() {
            set.iter().map(|s| (*s).to_string()).collect()
        } else {
            nodes
                .iter()
                .flat_map(|prefix| set.iter().map(move |add| format!("{prefix}{DOT}{add}")))
                .collect()
        };
    }

    tracing::trace!(
        segments = segments.len(),
        expanded = nodes.len(),
        "resolved shorthand node"
    );
    nodes.into_iter().collect()
}

/// Inner text of a `(a|b)` alternation, or `None` if `s` is not one
fn alternation(s: &str) -> Option<&str> {
    if !s.contains(VERTICAL_BAR) {
        return None;
    }
    s.strip_prefix('(')?.strip_suffix(')')
}

/// Shared server / world applicability check
fn scope_applies(
    own: Option<&str>,
    query: Option<&str>,
    include_global: bool,
    apply_regex: bool,
) -> bool {
    let query = match query {
        Some(q) if !q.is_empty() => q,
        _ => return true,
    };

    let Some(own) = own else {
        return include_global;
    };

    if apply_regex {
        if let Some(expr) = strip_regex_prefix(query) {
            return patterns::compile_anchored(expr).is_some_and(|regex| regex.is_match(own));
        }
    }

    if let Some(inner) = alternation(query) {
        return inner
            .split(VERTICAL_BAR)
            .any(|alternative| eq_ignore_case(alternative, own));
    }

    eq_ignore_case(own, query)
}

fn strip_regex_prefix(query: &str) -> Option<&str> {
    let prefix = query.get(..REGEX_QUERY_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(REGEX_QUERY_PREFIX) {
        query.get(REGEX_QUERY_PREFIX.len()..)
    } else {
        None
    }
}

/// Scope check of [`Node::almost_equals`]
fn presence_differs_compatibly(other: Option<&str>, own: Option<&str>) -> bool {
    if other.is_some() == own.is_some() {
        return false;
    }
    match (other, own) {
        (Some(other), Some(own)) => eq_ignore_case(other, own),
        (Some(_), None) => false,
        _ => true,
    }
}

/// Unicode-aware case-insensitive string equality
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_prefix_is_case_insensitive() {
        assert_eq!(strip_regex_prefix("r=abc"), Some("abc"));
        assert_eq!(strip_regex_prefix("R=abc"), Some("abc"));
        assert_eq!(strip_regex_prefix("r="), Some(""));
        assert_eq!(strip_regex_prefix("r"), None);
        assert_eq!(strip_regex_prefix("x=abc"), None);
        // multi-byte first char must not panic
        assert_eq!(strip_regex_prefix("é=abc"), None);
    }

    #[test]
    fn alternation_requires_parens_and_bar() {
        assert_eq!(alternation("(a|b)"), Some("a|b"));
        assert_eq!(alternation("(ab)"), None);
        assert_eq!(alternation("a|b"), None);
        assert_eq!(alternation("(a|b"), None);
    }

    #[test]
    fn case_folding() {
        assert!(eq_ignore_case("Survival", "sURVIVAL"));
        assert!(eq_ignore_case("ÉTÉ", "été"));
        assert!(!eq_ignore_case("a", "ab"));
    }

    #[test]
    fn presence_check_mirrors_almost_equals() {
        assert!(!presence_differs_compatibly(None, None));
        assert!(!presence_differs_compatibly(Some("a"), Some("a")));
        assert!(presence_differs_compatibly(None, Some("a")));
        assert!(!presence_differs_compatibly(Some("a"), None));
    }

    #[test]
    fn expand_restarts_after_empty_set() {
        let segments = vec![BTreeSet::from(["a"]), BTreeSet::new(), BTreeSet::from(["b", "c"])];
        assert_eq!(expand(&segments), vec!["b".to_string(), "c".to_string()]);
    }
}
