//! The checksum record served by a read.
//!
//! The checksum is exposed as a single addressable 8-byte record: `b` then
//! `a`, each as four lowercase hex digits, zero padded. Because both sums are
//! below `0x10000`, four digits always suffice.
//!
//! Reading the record is destructive. [`serve_record`] is the one place that
//! couples rendering, delivery and reset, and it fixes their order:
//!
//! 1. render the current `(a, b)`;
//! 2. deliver the record to the caller;
//! 3. reset the accumulator, only if delivery succeeded.
//!
//! A second read with no intervening write therefore reports `00000001`.

use std::fmt;

use crate::accumulator::{Accumulator, MOD};
use crate::error::{CoreError, Result};

/// Length of a rendered record in bytes.
pub const RECORD_LEN: usize = 8;

/// An 8-character hex rendering of the accumulator state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChecksumRecord([u8; RECORD_LEN]);

impl ChecksumRecord {
    /// Render the current state of an accumulator.
    pub fn render(acc: &Accumulator) -> Self {
        let mut out = [0u8; RECORD_LEN];
        // Both sums are below MOD < 0x10000, so the u16 narrowing is lossless.
        let halves = [acc.b() as u16, acc.a() as u16];
        for (dst, half) in out.chunks_exact_mut(RECORD_LEN / 2).zip(halves) {
            dst.copy_from_slice(hex::encode(half.to_be_bytes()).as_bytes());
        }
        Self(out)
    }

    /// Parse a record back into `(a, b)`.
    ///
    /// Rejects records whose sums are not below the modulus, since no
    /// accumulator can render them.
    pub fn parse(text: &str) -> Result<(u32, u32)> {
        if text.len() != RECORD_LEN {
            return Err(CoreError::MalformedRecord(format!(
                "expected {} characters, got {}",
                RECORD_LEN,
                text.len()
            )));
        }
        let bytes = hex::decode(text).map_err(|e| CoreError::MalformedRecord(e.to_string()))?;
        let b = u32::from(u16::from_be_bytes([bytes[0], bytes[1]]));
        let a = u32::from(u16::from_be_bytes([bytes[2], bytes[3]]));
        if a >= MOD || b >= MOD {
            return Err(CoreError::OutOfRange { a, b });
        }
        Ok((a, b))
    }

    /// The raw ASCII bytes.
    pub const fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.0
    }
}

impl fmt::Debug for ChecksumRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChecksumRecord({})", self)
    }
}

impl fmt::Display for ChecksumRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.0 {
            fmt::Write::write_char(f, char::from(c))?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for ChecksumRecord {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Where the read/reset protocol currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPhase {
    /// Bytes are being folded; the state has not been served since the last
    /// write.
    #[default]
    Accumulating,

    /// A record was just served and the accumulator was reset.
    JustServed,
}

/// Render the record, hand it to `deliver`, then reset on success.
///
/// If `deliver` fails its error is returned unchanged and the accumulator is
/// left exactly as it was.
pub fn serve_record<E, F>(acc: &mut Accumulator, deliver: F) -> std::result::Result<ChecksumRecord, E>
where
    F: FnOnce(&ChecksumRecord) -> std::result::Result<(), E>,
{
    let record = ChecksumRecord::render(acc);
    deliver(&record)?;
    acc.reset();
    Ok(record)
}
