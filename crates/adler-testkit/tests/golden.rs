//! Golden vectors must hold no matter where a live update interrupts them.

use std::sync::Arc;

use adler_device::store::{Registry, SqliteRegistry};
use adler_device::{Device, DeviceConfig, Grant, InitKind};
use adler_testkit::vectors::{all_vectors, vectors_json, VectorRecord};

async fn live_update(
    registry: &Arc<SqliteRegistry>,
    config: &DeviceConfig,
    device: &mut Device<SqliteRegistry>,
) {
    device.checkpoint_save().await.unwrap();
    *device = Device::with_shared_registry(config.clone(), Arc::clone(registry)).unwrap();
    device.init(InitKind::LiveUpdate).await.unwrap();
}

/// Feed `writes`, replacing the device before write `update_after`. When
/// `update_after == writes.len()` the replacement lands between the last
/// write and the read.
async fn run_with_update_after(
    registry: &Arc<SqliteRegistry>,
    config: &DeviceConfig,
    writes: &[Vec<u8>],
    update_after: usize,
) -> String {
    let mut device = Device::with_shared_registry(config.clone(), Arc::clone(registry)).unwrap();
    device.init(InitKind::Fresh).await.unwrap();

    for (i, payload) in writes.iter().enumerate() {
        if i == update_after {
            live_update(registry, config, &mut device).await;
        }
        device
            .write(0, payload.len(), &Grant::from_bytes(payload))
            .unwrap();
    }
    if update_after == writes.len() {
        live_update(registry, config, &mut device).await;
    }

    let mut sink = Grant::zeroed(8);
    device.read(0, 8, &mut sink).unwrap();
    String::from_utf8(sink.as_slice().to_vec()).unwrap()
}

#[tokio::test]
async fn test_vectors_survive_live_update_at_every_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(SqliteRegistry::open(dir.path().join("registry.db")).unwrap());

    for vector in all_vectors() {
        let config = DeviceConfig {
            folding: vector.folding,
            ..DeviceConfig::default()
        };
        for update_after in 0..=vector.writes.len() {
            let record = run_with_update_after(&registry, &config, &vector.writes, update_after).await;
            assert_eq!(
                record, vector.expected_record,
                "vector '{}' with update after {} writes",
                vector.name, update_after
            );
        }
        assert!(registry.keys().await.unwrap().is_empty(), "{}", vector.name);
    }
}

#[test]
fn test_vectors_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vectors.json");
    std::fs::write(&path, vectors_json().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let records: Vec<VectorRecord> = serde_json::from_str(&text).unwrap();
    let wikipedia = records.iter().find(|r| r.name == "Wikipedia").unwrap();
    assert_eq!(wikipedia.record, "11e60398");
    assert_eq!(hex::decode(&wikipedia.writes[0]).unwrap(), b"Wikipedia");
}
