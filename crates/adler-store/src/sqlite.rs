//! SQLite implementation of the Registry trait.
//!
//! The durable backend: values survive the process being replaced. Uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{PublishResult, Registry};

/// SQLite-based registry implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteRegistry {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRegistry {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

fn value_from_sql(raw: i64) -> Result<u32> {
    u32::try_from(raw)
        .map_err(|_| StoreError::InvalidData(format!("stored value {} is not a u32", raw)))
}

#[async_trait]
impl Registry for SqliteRegistry {
    async fn publish_u32(&self, key: &str, value: u32) -> Result<PublishResult> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let previous: Option<i64> = conn
                .query_row(
                    "SELECT value FROM registry WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;

            conn.execute(
                "INSERT INTO registry (key, value, published_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                published_at = excluded.published_at",
                params![key, i64::from(value), now_millis()],
            )?;

            match previous {
                Some(raw) => Ok(PublishResult::Overwritten {
                    previous: value_from_sql(raw)?,
                }),
                None => Ok(PublishResult::Published),
            }
        })
        .await
    }

    async fn retrieve_u32(&self, key: &str) -> Result<Option<u32>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let raw: Option<i64> = conn
                .query_row(
                    "SELECT value FROM registry WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            raw.map(value_from_sql).transpose()
        })
        .await
    }

    async fn delete_u32(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM registry WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM registry ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(keys)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RegistryExt;

    #[tokio::test]
    async fn test_sqlite_publish_and_retrieve() {
        let registry = SqliteRegistry::open_memory().unwrap();

        let result = registry.publish_u32("a", 11).await.unwrap();
        assert_eq!(result, PublishResult::Published);
        assert_eq!(registry.retrieve_u32("a").await.unwrap(), Some(11));
        assert_eq!(registry.retrieve_u32("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_overwrite() {
        let registry = SqliteRegistry::open_memory().unwrap();

        registry.publish_u32("b", 24).await.unwrap();
        let result = registry.publish_u32("b", 65520).await.unwrap();
        assert_eq!(result, PublishResult::Overwritten { previous: 24 });
        assert_eq!(registry.retrieve_u32("b").await.unwrap(), Some(65520));
    }

    #[tokio::test]
    async fn test_sqlite_full_u32_range() {
        let registry = SqliteRegistry::open_memory().unwrap();
        registry.publish_u32("max", u32::MAX).await.unwrap();
        assert_eq!(registry.retrieve_u32("max").await.unwrap(), Some(u32::MAX));
    }

    #[tokio::test]
    async fn test_sqlite_take_is_one_shot() {
        let registry = SqliteRegistry::open_memory().unwrap();
        registry.publish_u32("a", 7).await.unwrap();

        assert_eq!(registry.take_u32("a").await.unwrap(), Some(7));
        assert_eq!(registry.take_u32("a").await.unwrap(), None);
        assert!(registry.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");

        {
            let registry = SqliteRegistry::open(&path).unwrap();
            registry.publish_u32("a", 11).await.unwrap();
            registry.publish_u32("b", 24).await.unwrap();
        }

        let registry = SqliteRegistry::open(&path).unwrap();
        assert_eq!(registry.keys().await.unwrap(), vec!["a", "b"]);
        assert_eq!(registry.retrieve_u32("b").await.unwrap(), Some(24));
    }

    #[tokio::test]
    async fn test_sqlite_rejects_corrupt_value() {
        let registry = SqliteRegistry::open_memory().unwrap();
        registry
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO registry (key, value, published_at) VALUES ('a', -1, 0)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(matches!(
            registry.retrieve_u32("a").await,
            Err(StoreError::InvalidData(_))
        ));
    }
}
