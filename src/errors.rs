//! Error types for the automatic differentiation crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error variants for operation lookups.
pub enum ADError {
    #[error("Unknown operation: {0}")]
    /// No operation with this name is registered.
    UnknownOperation(String),
    #[error("Operation `{name}` takes {found} operand(s), expected {expected}")]
    /// The operation exists but with a different number of operands.
    ArityMismatch {
        /// Name that was looked up.
        name: String,
        /// Arity the caller asked for.
        expected: usize,
        /// Arity of the registered operation.
        found: usize,
    },
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, ADError>;
