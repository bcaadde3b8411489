//! Accumulator: the two bounded running sums behind the checksum.
//!
//! Every byte of the stream is folded in order:
//!
//! ```text
//! a = (a + byte) mod 65521
//! b = (b + a)    mod 65521
//! ```
//!
//! Reordering bytes almost always changes the final `(a, b)`, which is the
//! integrity property the checksum provides.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Modulus bounding both sums: the largest prime below 2^16.
pub const MOD: u32 = 65521;

/// Initial value of `a` on a fresh start and after every reset.
pub const INITIAL_A: u32 = 1;

/// Initial value of `b` on a fresh start and after every reset.
pub const INITIAL_B: u32 = 0;

/// How a byte is widened before being added into `a`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteFolding {
    /// Bytes are `0..=255`. This is standard Adler-32.
    #[default]
    Unsigned,

    /// Bytes with the high bit set are sign-extended, added to `a` with
    /// 32-bit wrap-around, then reduced modulo [`MOD`].
    ///
    /// Matches drivers that fold through a signed `char`. Only differs from
    /// [`ByteFolding::Unsigned`] for bytes `>= 0x80`.
    SignedLegacy,
}

impl ByteFolding {
    /// Add one byte into `a`, returning the reduced result.
    #[inline]
    fn add(self, a: u32, byte: u8) -> u32 {
        match self {
            ByteFolding::Unsigned => (a + u32::from(byte)) % MOD,
            ByteFolding::SignedLegacy => a.wrapping_add(byte as i8 as i32 as u32) % MOD,
        }
    }
}

/// The running checksum state.
///
/// Both sums are always in `[0, MOD)`. The only ways to change them are
/// [`update`](Self::update), [`reset`](Self::reset) and installing a
/// validated pair through [`from_parts`](Self::from_parts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accumulator {
    a: u32,
    b: u32,
    folding: ByteFolding,
}

impl Accumulator {
    /// Create an accumulator at `(1, 0)` with unsigned folding.
    pub const fn new() -> Self {
        Self::with_folding(ByteFolding::Unsigned)
    }

    /// Create an accumulator at `(1, 0)` with the given folding rule.
    pub const fn with_folding(folding: ByteFolding) -> Self {
        Self {
            a: INITIAL_A,
            b: INITIAL_B,
            folding,
        }
    }

    /// Build an accumulator from an externalized pair.
    ///
    /// Fails with [`CoreError::OutOfRange`] if either value is `>= MOD`.
    pub fn from_parts(a: u32, b: u32, folding: ByteFolding) -> Result<Self> {
        if a >= MOD || b >= MOD {
            return Err(CoreError::OutOfRange { a, b });
        }
        Ok(Self { a, b, folding })
    }

    /// Fold one byte into the sums.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.a = self.folding.add(self.a, byte);
        self.b = (self.b + self.a) % MOD;
    }

    /// Fold every byte of `bytes`, in order.
    pub fn update_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Return to `(1, 0)`. The folding rule is kept.
    pub fn reset(&mut self) {
        self.a = INITIAL_A;
        self.b = INITIAL_B;
    }

    /// The low sum.
    pub const fn a(&self) -> u32 {
        self.a
    }

    /// The high sum.
    pub const fn b(&self) -> u32 {
        self.b
    }

    /// Both sums as `(a, b)`.
    pub const fn parts(&self) -> (u32, u32) {
        (self.a, self.b)
    }

    /// The folding rule in effect.
    pub const fn folding(&self) -> ByteFolding {
        self.folding
    }

    /// Whether the state equals the reset value.
    pub const fn is_initial(&self) -> bool {
        self.a == INITIAL_A && self.b == INITIAL_B
    }

    /// The conventional packed Adler-32 value, `(b << 16) | a`.
    pub const fn value(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
