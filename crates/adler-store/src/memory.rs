//! In-memory implementation of the Registry trait.
//!
//! Same semantics as SQLite but nothing survives the process. Useful for
//! tests and for orchestrators that keep the registry in a separate,
//! long-lived process.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::{PublishResult, Registry};

/// In-memory registry implementation.
///
/// Thread-safe via RwLock.
pub struct MemoryRegistry {
    values: RwLock<BTreeMap<String, u32>>,
}

impl MemoryRegistry {
    /// Create a new empty in-memory registry.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored keys.
    ///
    /// Still answers after a holder panicked; the map itself is never left
    /// half-updated by any operation here.
    pub fn len(&self) -> usize {
        match self.values.read() {
            Ok(values) => values.len(),
            Err(poisoned) => {
                tracing::warn!("memory registry lock poisoned; reading through it");
                poisoned.into_inner().len()
            }
        }
    }

    /// Whether the registry holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn publish_u32(&self, key: &str, value: u32) -> Result<PublishResult> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        Ok(match values.insert(key.to_string(), value) {
            Some(previous) => PublishResult::Overwritten { previous },
            None => PublishResult::Published,
        })
    }

    async fn retrieve_u32(&self, key: &str) -> Result<Option<u32>> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).copied())
    }

    async fn delete_u32(&self, key: &str) -> Result<bool> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        Ok(values.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RegistryExt;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_memory_registry_basic() {
        let registry = MemoryRegistry::new();

        let result = registry.publish_u32("a", 11).await.unwrap();
        assert_eq!(result, PublishResult::Published);

        assert_eq!(registry.retrieve_u32("a").await.unwrap(), Some(11));
        assert_eq!(registry.retrieve_u32("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_registry_overwrite() {
        let registry = MemoryRegistry::new();

        registry.publish_u32("a", 1).await.unwrap();
        let result = registry.publish_u32("a", 2).await.unwrap();
        assert_eq!(result, PublishResult::Overwritten { previous: 1 });
        assert_eq!(registry.retrieve_u32("a").await.unwrap(), Some(2));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_registry_take_is_one_shot() {
        let registry = MemoryRegistry::new();
        registry.publish_u32("b", 24).await.unwrap();

        assert_eq!(registry.take_u32("b").await.unwrap(), Some(24));
        assert_eq!(registry.take_u32("b").await.unwrap(), None);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_memory_registry_keys_sorted() {
        let registry = MemoryRegistry::new();
        registry.publish_u32("b", 0).await.unwrap();
        registry.publish_u32("a", 1).await.unwrap();

        assert_eq!(registry.keys().await.unwrap(), vec!["a", "b"]);
        assert!(registry.delete_u32("a").await.unwrap());
        assert!(!registry.delete_u32("a").await.unwrap());
    }

    #[test]
    fn test_memory_registry_len_survives_poison() {
        let registry = Arc::new(MemoryRegistry::new());
        registry.values.write().unwrap().insert("a".into(), 1);

        let poisoner = Arc::clone(&registry);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.values.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn test_publish_then_take_roundtrips(
            key in "[a-z]{1,8}",
            first in any::<u32>(),
            second in any::<u32>(),
        ) {
            let registry = MemoryRegistry::new();
            let (published, overwritten, taken, again) = block_on(async {
                let published = registry.publish_u32(&key, first).await.unwrap();
                let overwritten = registry.publish_u32(&key, second).await.unwrap();
                let taken = registry.take_u32(&key).await.unwrap();
                let again = registry.take_u32(&key).await.unwrap();
                (published, overwritten, taken, again)
            });

            prop_assert_eq!(published, PublishResult::Published);
            prop_assert_eq!(overwritten, PublishResult::Overwritten { previous: first });
            prop_assert_eq!(taken, Some(second));
            prop_assert_eq!(again, None);
            prop_assert!(registry.is_empty());
        }
    }
}
