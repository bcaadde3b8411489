//! The Device: the checksum engine behind a character-device interface.
//!
//! The Device owns the accumulator and brings together the ingest pipeline,
//! the destructive record read, and checkpointing against a registry.
//!
//! Calls are expected one at a time from an external dispatcher. Mutating
//! operations take `&mut self`, so exclusive access is enforced by the
//! borrow checker rather than by a lock.

use std::sync::Arc;

use adler_core::{
    serve_record, Accumulator, Checkpoint, ReadPhase, KEY_A, KEY_B, RECORD_LEN,
};
use adler_store::{Registry, RegistryExt};

use crate::config::DeviceConfig;
use crate::copy::{CopySink, CopySource};
use crate::error::{DeviceError, Result};
use crate::ingest::IngestPipeline;

/// Why the device is being initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitKind {
    /// First start; no prior state.
    Fresh,
    /// Replacing a running instance; state is restored from the registry.
    LiveUpdate,
    /// Restart after a crash; prior state is discarded.
    Restart,
}

/// The main Device struct.
pub struct Device<R: Registry> {
    /// The running sums.
    acc: Accumulator,
    /// Read/reset protocol state.
    phase: ReadPhase,
    /// Chunked ingest buffer.
    pipeline: IngestPipeline,
    /// Checkpoint registry, shared with the restart orchestrator.
    registry: Arc<R>,
    /// Configuration.
    config: DeviceConfig,
}

impl<R: Registry> Device<R> {
    /// Create a new device at the initial state `(1, 0)`.
    pub fn new(config: DeviceConfig, registry: R) -> Result<Self> {
        Self::with_shared_registry(config, Arc::new(registry))
    }

    /// Create a device over a registry that outlives it.
    ///
    /// This is how an orchestrator hands the same registry to the outgoing
    /// and the incoming instance of a live update.
    pub fn with_shared_registry(config: DeviceConfig, registry: Arc<R>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            acc: Accumulator::with_folding(config.folding),
            phase: ReadPhase::Accumulating,
            pipeline: IngestPipeline::new(config.chunk_capacity),
            registry,
            config,
        })
    }

    /// Get the registry reference.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Get the configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Current accumulator state.
    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }

    /// Where the read/reset protocol stands.
    pub fn phase(&self) -> ReadPhase {
        self.phase
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Initialize the device.
    ///
    /// The state always starts at `(1, 0)`. For [`InitKind::LiveUpdate`] the
    /// checkpoint is then restored; this must finish before the device serves
    /// any read or write.
    pub async fn init(&mut self, kind: InitKind) -> Result<()> {
        self.acc.reset();
        self.phase = ReadPhase::Accumulating;
        tracing::info!(?kind, "initializing device");

        if kind == InitKind::LiveUpdate {
            self.checkpoint_restore().await?;
        }
        Ok(())
    }

    /// Open the device. Always succeeds.
    pub fn open(&self) -> Result<()> {
        Ok(())
    }

    /// Close the device. Always succeeds.
    pub fn close(&self) -> Result<()> {
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read / Write
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the checksum record. **Destructive.**
    ///
    /// The checksum is a single 8-byte record at offset 0:
    ///
    /// - `size < 8` fails with [`DeviceError::InvalidArgument`];
    /// - `offset >= 8` returns `0` (end of stream);
    /// - otherwise the record is copied to `sink` and, only if that copy
    ///   succeeds, the accumulator is reset to `(1, 0)`.
    ///
    /// A second read with no write in between reports `00000001`.
    pub fn read<S>(&mut self, offset: u64, size: usize, sink: &mut S) -> Result<usize>
    where
        S: CopySink + ?Sized,
    {
        tracing::debug!(offset, size, "read request");

        if size < RECORD_LEN {
            return Err(DeviceError::InvalidArgument { size });
        }
        if offset >= RECORD_LEN as u64 {
            return Ok(0);
        }

        let record = serve_record(&mut self.acc, |record| sink.copy_to(0, record.as_bytes()))
            .map_err(|e| {
                tracing::warn!(code = e.code, "record copy failed; state kept");
                DeviceError::from(e)
            })?;

        self.phase = ReadPhase::JustServed;
        tracing::debug!(%record, "served checksum record");
        Ok(RECORD_LEN)
    }

    /// Fold `size` bytes from `source` into the checksum.
    ///
    /// `offset` is ignored: every write appends to the single live stream.
    /// On a copy fault the bytes of already completed chunks stay folded.
    pub fn write<S>(&mut self, offset: u64, size: usize, source: &S) -> Result<usize>
    where
        S: CopySource + ?Sized,
    {
        tracing::debug!(offset, size, "write request");

        match self.pipeline.ingest(&mut self.acc, source, size) {
            Ok(folded) => {
                if folded > 0 {
                    self.phase = ReadPhase::Accumulating;
                }
                Ok(folded)
            }
            Err(fault) => {
                if fault.folded > 0 {
                    self.phase = ReadPhase::Accumulating;
                }
                tracing::warn!(
                    code = fault.error.code,
                    folded = fault.folded,
                    size,
                    "write aborted by copy fault"
                );
                Err(fault.error.into())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Checkpoint Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish the current state to the registry, overwriting any prior
    /// checkpoint.
    ///
    /// Both keys are cleared first, so a save that fails halfway leaves an
    /// incomplete checkpoint rather than a mix of old and new values.
    pub async fn checkpoint_save(&self) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::capture(&self.acc);
        self.registry.delete_u32(KEY_A).await?;
        self.registry.delete_u32(KEY_B).await?;
        self.registry.publish_u32(KEY_A, checkpoint.a).await?;
        self.registry.publish_u32(KEY_B, checkpoint.b).await?;
        tracing::info!(a = checkpoint.a, b = checkpoint.b, "checkpoint saved");
        Ok(checkpoint)
    }

    /// Consume the checkpoint from the registry and install it.
    ///
    /// The state is reset to `(1, 0)` first and only replaced by a valid
    /// checkpoint. Both keys are removed whether or not the checkpoint is
    /// usable. Returns `None` on a cold start.
    pub async fn checkpoint_restore(&mut self) -> Result<Option<Checkpoint>> {
        self.acc.reset();
        self.phase = ReadPhase::Accumulating;

        let a = self.registry.take_u32(KEY_A).await?;
        let b = self.registry.take_u32(KEY_B).await?;

        let checkpoint = match (a, b) {
            (Some(a), Some(b)) => Checkpoint { a, b },
            (None, None) => {
                tracing::warn!("no checkpoint found; keeping initial state");
                return Ok(None);
            }
            (None, Some(_)) => return Err(DeviceError::IncompleteCheckpoint(KEY_A)),
            (Some(_), None) => return Err(DeviceError::IncompleteCheckpoint(KEY_B)),
        };

        self.acc = checkpoint.install(self.config.folding)?;
        tracing::info!(a = checkpoint.a, b = checkpoint.b, "checkpoint restored");
        Ok(Some(checkpoint))
    }
}
