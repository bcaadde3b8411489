//! # Adler Testkit
//!
//! Testing utilities for the Adler device.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known byte streams with the records they must produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A device wired to a shared registry, live-update helpers,
//!   and a copy grant that faults on demand
//!
//! ## Golden Vectors
//!
//! ```rust
//! use adler_testkit::vectors::{all_vectors, run_vector};
//!
//! for vector in all_vectors() {
//!     let record = run_vector(&vector);
//!     assert_eq!(record, vector.expected_record, "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use adler_testkit::generators::{write_script, fold_script};
//!
//! proptest! {
//!     #[test]
//!     fn split_writes_match_one_write(script in write_script(8, 256)) {
//!         let joined: Vec<u8> = script.concat();
//!         prop_assert_eq!(fold_script(&script), fold_script(&[joined]));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use adler_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::new();
//! fixture.write(b"hello");
//! assert_eq!(fixture.read_record(), "062c0215");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{FaultyGrant, TestFixture};
pub use generators::{fold_script, WriteScript};
pub use vectors::{all_vectors, run_vector, verify_all_vectors, GoldenVector};
