//! Checkpoint: accumulator state externalized across a live update.

use serde::{Deserialize, Serialize};

use crate::accumulator::{Accumulator, ByteFolding};
use crate::error::Result;

/// Registry key holding the low sum.
pub const KEY_A: &str = "a";

/// Registry key holding the high sum.
pub const KEY_B: &str = "b";

/// A snapshot of the running sums.
///
/// The folding rule is not part of the snapshot; it comes from the
/// configuration of the process that installs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    pub a: u32,
    pub b: u32,
}

impl Checkpoint {
    /// Snapshot an accumulator.
    pub const fn capture(acc: &Accumulator) -> Self {
        Self {
            a: acc.a(),
            b: acc.b(),
        }
    }

    /// Rebuild an accumulator from this snapshot.
    ///
    /// Fails if either value is outside `[0, MOD)`.
    pub fn install(&self, folding: ByteFolding) -> Result<Accumulator> {
        Accumulator::from_parts(self.a, self.b, folding)
    }
}

impl From<&Accumulator> for Checkpoint {
    fn from(acc: &Accumulator) -> Self {
        Self::capture(acc)
    }
}
