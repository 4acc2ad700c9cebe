//! Error types for core-node

use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias for node operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors that can occur while building or decoding nodes
///
/// The matching engine never produces these: every matching predicate is
/// total and answers with a plain `bool`.
#[derive(Error, Debug)]
pub enum NodeError {
    /// A constructor argument was rejected (empty permission, invalid server name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not valid for this node (group name of a non-group
    /// node, mutation of a built node)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The `$<expiry>` segment of an encoded node is not a valid integer
    #[error("Invalid expiry '{value}': {source}")]
    InvalidExpiry {
        /// The raw expiry text
        value: String,
        /// Underlying integer parse failure
        #[source]
        source: ParseIntError,
    },

    /// Shorthand expansion would produce more nodes than allowed
    #[error("Shorthand expansion exceeds maximum {max} nodes (attempted: {attempted})")]
    ExpansionTooLarge {
        /// Maximum allowed expansion
        max: usize,
        /// Size of the expansion that was refused
        attempted: usize,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
