//! Ingest pipeline: folds a write payload through a bounded buffer.
//!
//! The payload is copied from caller memory one chunk at a time. Every byte
//! of a chunk is folded into the accumulator before the next chunk is
//! fetched, so a copy failure in chunk `k` leaves chunks `0..k` folded.
//! There is no rollback.

use adler_core::Accumulator;

use crate::copy::{CopyError, CopySource};

/// A copy failure partway through a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestFault {
    /// Bytes folded before the failing chunk.
    pub folded: usize,
    /// The copy primitive's error.
    pub error: CopyError,
}

/// Chunked ingest through a fixed-capacity buffer.
#[derive(Debug)]
pub struct IngestPipeline {
    buf: Vec<u8>,
}

impl IngestPipeline {
    /// Create a pipeline whose buffer holds `capacity` bytes.
    ///
    /// `capacity` must be non-zero; [`DeviceConfig::validate`] enforces this.
    ///
    /// [`DeviceConfig::validate`]: crate::config::DeviceConfig::validate
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
        }
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Fold `size` bytes from `source` into `acc`.
    ///
    /// Returns `size` on success.
    pub fn ingest<S>(
        &mut self,
        acc: &mut Accumulator,
        source: &S,
        size: usize,
    ) -> Result<usize, IngestFault>
    where
        S: CopySource + ?Sized,
    {
        let mut folded = 0;
        while folded < size {
            let len = (size - folded).min(self.buf.len());
            let chunk = &mut self.buf[..len];
            source
                .copy_from(folded, chunk)
                .map_err(|error| IngestFault { folded, error })?;
            acc.update_slice(chunk);
            folded += len;
        }
        Ok(folded)
    }
}
