//! Shared delimiters and compiled patterns for the node encoding.
//!
//! Detectors are compiled once on first use and are safe for unsynchronized
//! concurrent reads afterwards.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

/// Separates the `server[-world]` scope from the rest of an encoded node
pub const SERVER_DELIMITER: char = '/';

/// Separates server from world inside the scope prefix
pub const WORLD_DELIMITER: char = '-';

/// Separates the permission from its expiry timestamp
pub const TEMP_DELIMITER: char = '$';

/// Separates alternatives inside a `(a|b|c)` group
pub const VERTICAL_BAR: char = '|';

/// Separates permission segments
pub const DOT: char = '.';

/// Separates `key=value` pairs inside a context block
pub const CONTEXT_SEPARATOR: char = ',';

/// Separates a context key from its value
pub const CONTEXT_ASSIGN: char = '=';

/// Upper bound on the compiled size of user-supplied query regexes
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Matches a whole `group.<name>` permission; the name is non-empty and dot-free
pub fn group_match() -> &'static Regex {
    static GROUP_MATCH: OnceLock<Regex> = OnceLock::new();
    GROUP_MATCH.get_or_init(|| static_regex(r"^group\.[^.]+$"))
}

/// Finds a parenthesised segment eligible for shorthand expansion
pub fn shorthand_node() -> &'static Regex {
    static SHORTHAND_NODE: OnceLock<Regex> = OnceLock::new();
    SHORTHAND_NODE.get_or_init(|| static_regex(r"\([^.()]+\)"))
}

/// Matches a node carrying a leading `(key=value,...)` context block
pub fn node_contexts() -> &'static Regex {
    static NODE_CONTEXTS: OnceLock<Regex> = OnceLock::new();
    NODE_CONTEXTS.get_or_init(|| static_regex(r"^\([^)]*=[^)]*\).*$"))
}

fn static_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Only reachable if one of the literals above is edited into an invalid pattern.
        Err(e) => unreachable!("built-in pattern {pattern:?} failed to compile: {e}"),
    }
}

/// Compile a user-supplied regular expression.
///
/// Returns `None` instead of failing when `pattern` is not a valid expression
/// or compiles beyond [`REGEX_SIZE_LIMIT`]. Callers treat `None` as "no match".
pub fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "rejected query regex");
            None
        }
    }
}

/// Compile a user-supplied regular expression that must span the whole input.
///
/// The raw pattern is validated on its own first, so an unbalanced input such
/// as `a)|(b` cannot escape the anchoring group.
pub fn compile_anchored(pattern: &str) -> Option<Regex> {
    compile(pattern)?;
    compile(&format!("^(?:{pattern})$"))
}

/// Split `s` on `delimiter` the way the encoding expects: trailing empty
/// pieces are dropped, leading and inner empty pieces are kept.
pub(crate) fn split_trimmed(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts: Vec<&str> = s.split(delimiter).collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}
