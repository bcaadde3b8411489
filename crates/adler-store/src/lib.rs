//! # Adler Store
//!
//! The durable key-value registry that carries accumulator state across a
//! live update. The restart orchestrator owns the registry; the device only
//! publishes into it before being replaced and consumes from it after.
//!
//! ## Key Types
//!
//! - [`Registry`] - The async trait for publish/retrieve/delete of `u32` values
//! - [`RegistryExt`] - One-shot consumption built on top of [`Registry`]
//! - [`SqliteRegistry`] - SQLite-based durable registry
//! - [`MemoryRegistry`] - In-memory registry for tests and single-process use
//! - [`PublishResult`] - Whether a publish created or replaced a value
//!
//! ## Usage
//!
//! ```rust,no_run
//! use adler_store::{Registry, RegistryExt, SqliteRegistry};
//!
//! async fn example() {
//!     let registry = SqliteRegistry::open("registry.db").unwrap();
//!
//!     registry.publish_u32("a", 11).await.unwrap();
//!
//!     // Retrieve and delete in one step.
//!     let a = registry.take_u32("a").await.unwrap();
//!     assert_eq!(a, Some(11));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Overwrite on publish**: publishing an existing key replaces its value
//! - **Explicit deletion**: retrieving does not consume; use `take_u32`

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryRegistry;
pub use sqlite::SqliteRegistry;
pub use traits::{PublishResult, Registry, RegistryExt};
