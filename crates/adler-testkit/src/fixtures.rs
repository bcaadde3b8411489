//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::cell::Cell;
use std::sync::Arc;

use adler_device::store::MemoryRegistry;
use adler_device::{
    Checkpoint, CopyError, CopySink, CopySource, Device, DeviceConfig, Grant, InitKind,
};

/// A device wired to an in-memory registry that outlives it.
pub struct TestFixture {
    pub device: Device<MemoryRegistry>,
    registry: Arc<MemoryRegistry>,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DeviceConfig::default())
    }

    /// Create a fixture with a specific configuration.
    ///
    /// Panics if the configuration is invalid.
    pub fn with_config(config: DeviceConfig) -> Self {
        let registry = Arc::new(MemoryRegistry::new());
        let device = Device::with_shared_registry(config, Arc::clone(&registry))
            .expect("fixture configuration must be valid");
        Self { device, registry }
    }

    /// The registry shared across live updates.
    pub fn registry(&self) -> &MemoryRegistry {
        &self.registry
    }

    /// Write `payload` in full and return the byte count.
    pub fn write(&mut self, payload: &[u8]) -> usize {
        self.device
            .write(0, payload.len(), &Grant::from_bytes(payload))
            .expect("write within grant")
    }

    /// Read the record at offset 0 as a string.
    pub fn read_record(&mut self) -> String {
        let mut sink = Grant::zeroed(8);
        let n = self.device.read(0, 8, &mut sink).expect("full-size read");
        assert_eq!(n, 8);
        String::from_utf8_lossy(sink.as_slice()).into_owned()
    }

    /// Replace the device the way a live update would: save, drop, start a
    /// new instance with `config` and restore.
    ///
    /// Returns the checkpoint that crossed the boundary.
    pub async fn live_update_with(&mut self, config: DeviceConfig) -> Checkpoint {
        let checkpoint = self
            .device
            .checkpoint_save()
            .await
            .expect("save into memory registry");

        let mut next = Device::with_shared_registry(config, Arc::clone(&self.registry))
            .expect("fixture configuration must be valid");
        next.init(InitKind::LiveUpdate)
            .await
            .expect("restore from memory registry");
        self.device = next;
        checkpoint
    }

    /// [`live_update_with`](Self::live_update_with) keeping the current
    /// configuration.
    pub async fn live_update(&mut self) -> Checkpoint {
        let config = self.device.config().clone();
        self.live_update_with(config).await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A grant whose `n`-th copy call fails with a chosen code.
///
/// Calls before the failing one behave like a plain [`Grant`].
pub struct FaultyGrant {
    inner: Grant,
    fail_on_call: usize,
    code: i32,
    calls: Cell<usize>,
}

impl FaultyGrant {
    /// Wrap `data`; copy call number `fail_on_call` (0-based) fails with `code`.
    pub fn new(data: &[u8], fail_on_call: usize, code: i32) -> Self {
        Self {
            inner: Grant::from_bytes(data),
            fail_on_call,
            code,
            calls: Cell::new(0),
        }
    }

    /// A zeroed sink of `len` bytes whose call `fail_on_call` fails.
    pub fn sink(len: usize, fail_on_call: usize, code: i32) -> Self {
        Self {
            inner: Grant::zeroed(len),
            fail_on_call,
            code,
            calls: Cell::new(0),
        }
    }

    /// Number of copy calls made so far, including the failing one.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Current contents of the wrapped window.
    pub fn as_slice(&self) -> &[u8] {
        self.inner.as_slice()
    }

    fn tick(&self) -> Result<(), CopyError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call == self.fail_on_call {
            Err(CopyError::new(self.code))
        } else {
            Ok(())
        }
    }
}

impl CopySource for FaultyGrant {
    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<(), CopyError> {
        self.tick()?;
        self.inner.copy_from(offset, dst)
    }
}

impl CopySink for FaultyGrant {
    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<(), CopyError> {
        self.tick()?;
        self.inner.copy_to(offset, src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{chunk_capacity, fold_script, write_script};
    use adler_device::{Accumulator, DeviceError, ReadPhase};
    use proptest::prelude::*;

    #[test]
    fn test_fixture_destructive_read() {
        let mut fixture = TestFixture::new();
        assert_eq!(fixture.write(&[1, 2, 3, 4]), 4);
        assert_eq!(fixture.read_record(), "0018000b");
        assert_eq!(fixture.read_record(), "00000001");
    }

    #[test]
    fn test_faulty_grant_partial_commit() {
        let mut fixture = TestFixture::new();
        let payload: Vec<u8> = (0..250u16).map(|i| i as u8).collect();

        // Chunks of 100: calls 0 and 1 succeed, call 2 fails.
        let source = FaultyGrant::new(&payload, 2, -5);
        let err = fixture.device.write(0, payload.len(), &source).unwrap_err();
        assert!(matches!(err, DeviceError::CopyFault { code: -5 }));
        assert_eq!(source.calls(), 3);

        let mut expected = Accumulator::new();
        expected.update_slice(&payload[..200]);
        assert_eq!(*fixture.device.accumulator(), expected);
    }

    #[test]
    fn test_faulty_grant_first_chunk_folds_nothing() {
        let mut fixture = TestFixture::new();
        let source = FaultyGrant::new(b"abc", 0, 14);
        assert!(fixture.device.write(0, 3, &source).is_err());
        assert!(fixture.device.accumulator().is_initial());
    }

    #[test]
    fn test_faulty_sink_keeps_state() {
        let mut fixture = TestFixture::new();
        fixture.write(b"abc");

        let mut sink = FaultyGrant::sink(8, 0, 14);
        assert!(matches!(
            fixture.device.read(0, 8, &mut sink),
            Err(DeviceError::CopyFault { code: 14 })
        ));
        assert_eq!(sink.as_slice(), &[0u8; 8]);
        assert_eq!(fixture.device.phase(), ReadPhase::Accumulating);
        assert_eq!(fixture.read_record(), "024d0127");
    }

    #[tokio::test]
    async fn test_live_update_preserves_stream() {
        let mut fixture = TestFixture::new();
        fixture.write(b"Wiki");
        let checkpoint = fixture.live_update().await;
        assert_eq!(Checkpoint::capture(fixture.device.accumulator()), checkpoint);
        assert!(fixture.registry().is_empty());

        fixture.write(b"pedia");
        assert_eq!(fixture.read_record(), "11e60398");
    }

    proptest! {
        #[test]
        fn test_record_independent_of_chunk_capacity(
            capacity in chunk_capacity(),
            script in write_script(6, 400),
        ) {
            let mut fixture = TestFixture::with_config(DeviceConfig {
                chunk_capacity: capacity,
                ..DeviceConfig::default()
            });
            for payload in &script {
                fixture.write(payload);
            }
            prop_assert_eq!(*fixture.device.accumulator(), fold_script(&script));
        }
    }
}
