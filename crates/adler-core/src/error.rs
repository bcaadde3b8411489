//! Error types for the Adler core.

use thiserror::Error;

/// Errors that can occur while building or parsing core values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// One of the running sums is not below the modulus.
    #[error("accumulator state out of range: a={a}, b={b}")]
    OutOfRange { a: u32, b: u32 },

    /// A checksum record could not be parsed.
    #[error("malformed checksum record: {0}")]
    MalformedRecord(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
