// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Synthetic snapshot files for tests and demos.

use crate::checksum::{checksum_slice, Checksum};
use crate::error::Result;
use crate::header::Header;
use crate::layout::{CHECKSUM_DOMAIN_START, CHECKSUM_OFFSET, CHECKSUM_LEN};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SAMPLE_VERSION: &[u8] = b"10.2.154.26-electron.0";

/// A plausible two-context header with a zeroed checksum.
pub fn sample_header() -> Header {
    Header {
        number_of_contexts: 2,
        rehashability: 1,
        checksum: Checksum::default(),
        version: SAMPLE_VERSION.to_vec(),
        offset_to_read_only: 96,
        offset_to_context_0: 160,
        offset_to_context_1: 224,
    }
}

/// Deterministic payload bytes, `len` long.
pub fn sample_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 3)) as u8).collect()
}

/// Header bytes followed by the payload, with the header's checksum left as given.
pub fn build_snapshot(header: &Header, payload: &[u8]) -> Vec<u8> {
    let mut bytes = header.encode().to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

/// Like [`build_snapshot`] but with the stored checksum matching the payload.
pub fn sealed_snapshot(header: &Header, payload: &[u8]) -> Vec<u8> {
    let mut bytes = build_snapshot(header, payload);
    seal(&mut bytes);
    bytes
}

/// Recomputes and stores the checksum of an in-memory snapshot.
pub fn seal(bytes: &mut [u8]) -> Checksum {
    let checksum = checksum_slice(&bytes[CHECKSUM_DOMAIN_START as usize..]);
    let start = CHECKSUM_OFFSET as usize;
    bytes[start..start + CHECKSUM_LEN].copy_from_slice(&checksum.to_le_bytes());
    checksum
}

pub fn write_snapshot(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_data()?;
    Ok(())
}

pub struct TestPaths {
    pub valid: PathBuf,
    pub corrupted: PathBuf,
    pub truncated: PathBuf,
}

/// Writes a valid snapshot, one with a flipped checksum bit and a 10-byte stub into `dir`.
pub fn generate_test_scenario(dir: &Path) -> Result<TestPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let bytes = sealed_snapshot(&sample_header(), &sample_payload(256));

    let valid = dir.join("snapshot_blob.bin");
    write_snapshot(&valid, &bytes)?;

    let mut corrupted_bytes = bytes.clone();
    corrupted_bytes[CHECKSUM_OFFSET as usize] ^= 0x01;
    let corrupted = dir.join("corrupted_blob.bin");
    write_snapshot(&corrupted, &corrupted_bytes)?;

    let truncated = dir.join("truncated_blob.bin");
    write_snapshot(&truncated, &bytes[..10])?;

    Ok(TestPaths {
        valid,
        corrupted,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fixture_generator() {
        let dir = tempdir().unwrap();
        let paths = generate_test_scenario(dir.path()).unwrap();

        assert!(paths.valid.exists());
        assert!(paths.corrupted.exists());
        assert_eq!(fs::metadata(&paths.truncated).unwrap().len(), 10);

        let bytes = fs::read(&paths.valid).unwrap();
        let header = Header::read_from(&mut &bytes[..]).unwrap();
        assert_eq!(header.version, SAMPLE_VERSION);
        assert_eq!(header.checksum, checksum_slice(&bytes[16..]));
    }

    #[test]
    fn test_seal_is_stable() {
        let mut bytes = build_snapshot(&sample_header(), &sample_payload(64));
        let first = seal(&mut bytes);
        let second = seal(&mut bytes);
        assert_eq!(first, second);
    }
}
