//! Golden test vectors for deterministic verification.
//!
//! Each vector is a sequence of writes and the record the following read must
//! return. Unsigned vectors match zlib's `adler32`; signed-legacy vectors pin
//! down the sign-extension behavior for bytes `>= 0x80`.

use adler_core::ByteFolding;
use adler_device::store::MemoryRegistry;
use adler_device::{Device, DeviceConfig, Grant};
use serde::{Deserialize, Serialize};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Folding rule the device runs with.
    pub folding: ByteFolding,
    /// Payloads written in order before the read.
    pub writes: Vec<Vec<u8>>,
    /// Expected 8-character record.
    pub expected_record: &'static str,
}

/// Portable form of a vector, with payloads hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub name: String,
    pub folding: ByteFolding,
    pub writes: Vec<String>,
    pub record: String,
}

impl GoldenVector {
    fn new(
        name: &'static str,
        folding: ByteFolding,
        writes: Vec<Vec<u8>>,
        expected_record: &'static str,
    ) -> Self {
        Self {
            name,
            folding,
            writes,
            expected_record,
        }
    }

    /// Convert to the portable form.
    pub fn to_record(&self) -> VectorRecord {
        VectorRecord {
            name: self.name.to_string(),
            folding: self.folding,
            writes: self.writes.iter().map(hex::encode).collect(),
            record: self.expected_record.to_string(),
        }
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    use ByteFolding::{SignedLegacy, Unsigned};

    vec![
        GoldenVector::new("no writes", Unsigned, vec![], "00000001"),
        GoldenVector::new("empty write", Unsigned, vec![vec![]], "00000001"),
        GoldenVector::new("bytes 1 2 3 4", Unsigned, vec![vec![1, 2, 3, 4]], "0018000b"),
        GoldenVector::new(
            "bytes 1 2 3 4 split",
            Unsigned,
            vec![vec![1, 2], vec![], vec![3], vec![4]],
            "0018000b",
        ),
        GoldenVector::new("single a", Unsigned, vec![b"a".to_vec()], "00620062"),
        GoldenVector::new("abc", Unsigned, vec![b"abc".to_vec()], "024d0127"),
        GoldenVector::new("hello", Unsigned, vec![b"hello".to_vec()], "062c0215"),
        GoldenVector::new(
            "message digest",
            Unsigned,
            vec![b"message digest".to_vec()],
            "29750586",
        ),
        GoldenVector::new("Wikipedia", Unsigned, vec![b"Wikipedia".to_vec()], "11e60398"),
        GoldenVector::new("all byte values", Unsigned, vec![(0..=255u8).collect()], "adf67f81"),
        GoldenVector::new("1000 zeros", Unsigned, vec![vec![0; 1000]], "03e80001"),
        // Long enough for both sums to wrap the modulus many times.
        GoldenVector::new("5553 x 0xff", Unsigned, vec![vec![0xff; 5553]], "8e299c8b"),
        GoldenVector::new("hello signed", SignedLegacy, vec![b"hello".to_vec()], "062c0215"),
        GoldenVector::new(
            "high bytes signed",
            SignedLegacy,
            vec![vec![0x80, 0x81, 0x82]],
            "016c0046",
        ),
        GoldenVector::new(
            "all byte values signed",
            SignedLegacy,
            vec![(0..=255u8).collect()],
            "7a260062",
        ),
        GoldenVector::new(
            "5553 x 0xff signed",
            SignedLegacy,
            vec![vec![0xff; 5553]],
            "93330049",
        ),
    ]
}

/// Run a vector through a fresh device and return the record read back.
pub fn run_vector(vector: &GoldenVector) -> String {
    let config = DeviceConfig {
        folding: vector.folding,
        ..DeviceConfig::default()
    };
    let mut device = Device::new(config, MemoryRegistry::new()).expect("default config is valid");

    for payload in &vector.writes {
        device
            .write(0, payload.len(), &Grant::from_bytes(payload))
            .expect("write within grant");
    }

    let mut sink = Grant::zeroed(8);
    device.read(0, 8, &mut sink).expect("full-size read");
    String::from_utf8_lossy(sink.as_slice()).into_owned()
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, actual_record)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = run_vector(v);
            (v.name.to_string(), actual == v.expected_record, actual)
        })
        .collect()
}

/// All vectors as pretty-printed JSON, for other implementations to consume.
pub fn vectors_json() -> serde_json::Result<String> {
    let records: Vec<VectorRecord> = all_vectors().iter().map(GoldenVector::to_record).collect();
    serde_json::to_string_pretty(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adler_core::{Accumulator, ChecksumRecord};

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{}' produced {}", name, actual);
        }
    }

    #[test]
    fn test_expected_records_parse_to_folded_sums() {
        for vector in all_vectors() {
            let mut acc = Accumulator::with_folding(vector.folding);
            for payload in &vector.writes {
                acc.update_slice(payload);
            }
            assert_eq!(
                ChecksumRecord::parse(vector.expected_record),
                Ok(acc.parts()),
                "{}",
                vector.name
            );
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            assert_eq!(run_vector(&vector), run_vector(&vector), "{}", vector.name);
        }
    }

    #[test]
    fn test_vectors_json_roundtrip() {
        let json = vectors_json().unwrap();
        let records: Vec<VectorRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), all_vectors().len());

        let split = records
            .iter()
            .find(|r| r.name == "bytes 1 2 3 4 split")
            .unwrap();
        assert_eq!(split.writes, vec!["0102", "", "03", "04"]);
        assert_eq!(split.folding, ByteFolding::Unsigned);
        assert!(json.contains("\"signed_legacy\""));
    }
}
