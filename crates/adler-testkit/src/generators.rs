//! Proptest generators for property-based testing.

use proptest::prelude::*;

use adler_core::{Accumulator, ByteFolding, Checkpoint, MOD};

/// A sequence of write payloads.
pub type WriteScript = Vec<Vec<u8>>;

/// Generate either folding rule.
pub fn folding() -> impl Strategy<Value = ByteFolding> {
    prop_oneof![Just(ByteFolding::Unsigned), Just(ByteFolding::SignedLegacy)]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate up to `max_writes` payloads of up to `max_len` bytes each.
pub fn write_script(max_writes: usize, max_len: usize) -> impl Strategy<Value = WriteScript> {
    prop::collection::vec(payload(max_len), 0..=max_writes)
}

/// Generate an in-range checkpoint.
pub fn checkpoint() -> impl Strategy<Value = Checkpoint> {
    (0..MOD, 0..MOD).prop_map(|(a, b)| Checkpoint { a, b })
}

/// Generate an accumulator at an arbitrary valid state.
pub fn accumulator() -> impl Strategy<Value = Accumulator> {
    (checkpoint(), folding()).prop_map(|(cp, folding)| {
        // Strategy values are in range by construction.
        Accumulator::from_parts(cp.a, cp.b, folding).unwrap_or_default()
    })
}

/// Generate a buffer capacity for the ingest pipeline.
pub fn chunk_capacity() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), Just(100usize), 1usize..=512]
}

/// Fold a script with unsigned folding from the initial state.
pub fn fold_script(script: &[Vec<u8>]) -> Accumulator {
    let mut acc = Accumulator::new();
    for payload in script {
        acc.update_slice(payload);
    }
    acc
}
