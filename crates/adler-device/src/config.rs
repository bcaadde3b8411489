//! Device configuration.

use adler_core::ByteFolding;
use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Result};

/// Default capacity of the ingest buffer in bytes.
pub const DEFAULT_CHUNK_CAPACITY: usize = 100;

/// Configuration for the Device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Capacity of the bounded buffer writes are copied through.
    pub chunk_capacity: usize,
    /// How bytes are widened before being folded.
    pub folding: ByteFolding,
}

impl DeviceConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// ```
    /// use adler_device::DeviceConfig;
    ///
    /// let config = DeviceConfig::from_json(r#"{"folding": "signed_legacy"}"#).unwrap();
    /// assert_eq!(config.chunk_capacity, 100);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DeviceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_capacity == 0 {
            return Err(DeviceError::InvalidConfig(
                "chunk_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            folding: ByteFolding::Unsigned,
        }
    }
}
