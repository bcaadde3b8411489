//! Error types for the Device.

use adler_core::CoreError;
use adler_store::StoreError;
use thiserror::Error;

use crate::copy::CopyError;

/// Errors that can occur during Device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// A read asked for fewer bytes than a full record.
    #[error("invalid argument: read size {size} is smaller than the 8-byte record")]
    InvalidArgument { size: usize },

    /// The copy between caller and device memory failed.
    ///
    /// `code` is the copy primitive's native error code, unchanged.
    #[error("copy fault: code {code}")]
    CopyFault { code: i32 },

    /// Registry error.
    #[error("registry error: {0}")]
    Store(#[from] StoreError),

    /// Restored state failed validation.
    #[error("checkpoint error: {0}")]
    Core(#[from] CoreError),

    /// Only one of the two checkpoint keys was present.
    #[error("incomplete checkpoint: key {0:?} missing")]
    IncompleteCheckpoint(&'static str),

    /// Configuration rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<CopyError> for DeviceError {
    fn from(e: CopyError) -> Self {
        DeviceError::CopyFault { code: e.code }
    }
}

/// Result type for Device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
