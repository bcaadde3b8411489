//! # Adler Device
//!
//! A running Adler-32 checksum over an arbitrary byte stream, exposed through
//! a minimal character-device interface, with checkpoints that carry the
//! state across a live update.
//!
//! ## Overview
//!
//! - **Write** folds bytes into the checksum through a bounded buffer
//! - **Read** returns the checksum as an 8-character hex record and resets it
//! - **Checkpoint** publishes the state to a registry before the process is
//!   replaced; the new process restores it during [`InitKind::LiveUpdate`]
//!
//! ## Key Concepts
//!
//! - **Destructive read**: a successful read resets the state to `(1, 0)`.
//!   Reading twice in a row reports `00000001` the second time.
//! - **Offsets**: ignored on write; on read, any offset `>= 8` is end of stream.
//! - **Partial commit**: a copy fault mid-write keeps earlier chunks folded.
//!
//! ## Usage
//!
//! ```rust
//! use adler_device::{Device, DeviceConfig, Grant, InitKind};
//! use adler_device::store::MemoryRegistry;
//!
//! async fn example() {
//!     let mut device = Device::new(DeviceConfig::default(), MemoryRegistry::new()).unwrap();
//!     device.init(InitKind::Fresh).await.unwrap();
//!
//!     device.write(0, 4, &Grant::from_bytes(&[1, 2, 3, 4])).unwrap();
//!
//!     let mut out = Grant::zeroed(8);
//!     device.read(0, 8, &mut out).unwrap();
//!     assert_eq!(out.as_slice(), b"0018000b");
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `adler_device::core` - Accumulator, record and checkpoint primitives
//! - `adler_device::store` - Registry abstraction, memory and SQLite backends

pub mod config;
pub mod copy;
pub mod device;
pub mod error;
pub mod ingest;

// Re-export component crates
pub use adler_core as core;
pub use adler_store as store;

// Re-export main types for convenience
pub use config::{DeviceConfig, DEFAULT_CHUNK_CAPACITY};
pub use copy::{CopyError, CopySink, CopySource, Grant};
pub use device::{Device, InitKind};
pub use error::{DeviceError, Result};
pub use ingest::{IngestFault, IngestPipeline};

// Re-export commonly used core types
pub use adler_core::{Accumulator, ByteFolding, Checkpoint, ChecksumRecord, ReadPhase, MOD};
