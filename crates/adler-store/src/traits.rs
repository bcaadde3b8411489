//! Registry trait: the abstract interface for checkpoint persistence.
//!
//! This trait allows the device to be storage-agnostic. Implementations
//! include SQLite (durable) and in-memory (for tests).

use async_trait::async_trait;

use crate::error::Result;

/// Result of publishing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishResult {
    /// The key did not exist before.
    Published,
    /// The key existed and its value was replaced.
    Overwritten {
        /// The value that was replaced.
        previous: u32,
    },
}

/// The Registry trait: async interface for keyed `u32` values.
///
/// All methods are async to support both blocking (SQLite) and in-memory
/// backends. For SQLite, work runs on `spawn_blocking`.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Publish `value` under `key`, overwriting any prior value.
    async fn publish_u32(&self, key: &str, value: u32) -> Result<PublishResult>;

    /// Retrieve the value under `key`, if any. Does not remove it.
    async fn retrieve_u32(&self, key: &str) -> Result<Option<u32>>;

    /// Delete `key`. Returns whether it existed.
    async fn delete_u32(&self, key: &str) -> Result<bool>;

    /// List all keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Extension trait for common registry patterns.
pub trait RegistryExt: Registry {
    /// Retrieve the value under `key` and delete it.
    fn take_u32(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<u32>>> + Send;
}

impl<R: Registry + ?Sized> RegistryExt for R {
    async fn take_u32(&self, key: &str) -> Result<Option<u32>> {
        let value = self.retrieve_u32(key).await?;
        if value.is_some() {
            self.delete_u32(key).await?;
        }
        Ok(value)
    }
}
