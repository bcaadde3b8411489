//! # Adler Core
//!
//! Pure primitives for the Adler device: the running checksum accumulator,
//! its fixed-size textual record, and the checkpoint snapshot used across a
//! live update.
//!
//! This crate contains no I/O, no storage, no copying between address spaces.
//! It is pure computation over two bounded running sums.
//!
//! ## Key Types
//!
//! - [`Accumulator`] - The `(a, b)` running sums and the byte-folding rule
//! - [`ByteFolding`] - How a byte is widened before it is added into `a`
//! - [`ChecksumRecord`] - The 8-character hex rendering served by a read
//! - [`Checkpoint`] - Externalized accumulator state
//! - [`ReadPhase`] - Whether the last successful operation was a read
//!
//! ## Destructive reads
//!
//! Serving a record resets the accumulator. See [`serve_record`] for the
//! exact ordering between delivering the record and resetting the state.

pub mod accumulator;
pub mod checkpoint;
pub mod error;
pub mod record;

pub use accumulator::{Accumulator, ByteFolding, INITIAL_A, INITIAL_B, MOD};
pub use checkpoint::{Checkpoint, KEY_A, KEY_B};
pub use error::{CoreError, Result};
pub use record::{serve_record, ChecksumRecord, ReadPhase, RECORD_LEN};
