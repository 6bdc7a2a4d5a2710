//! Protocol-level error types.

use thiserror::Error;

/// Errors that can occur while parsing wire-format headers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// Fewer bytes were supplied than the fixed layout requires.
    #[error("header too short: expected at least {expected} bytes, got {actual}")]
    HeaderTooShort {
        /// Bytes required by the layout.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },
}

/// Convenience alias for fallible protocol operations.
pub type Result<T> = std::result::Result<T, ProtoError>;
