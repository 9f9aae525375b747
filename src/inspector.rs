// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Describe, verify and repair operations over a single snapshot.
//!
//! Every operation reports through a [`StatusSink`] and also returns its
//! outcome. Failures become one error-level status line plus an `Err`;
//! a checksum mismatch is a normal [`Verification`] result.
//!
//! Handle-level operations (`describe`, `verify`, `repair`) leave the cursor
//! of the supplied stream where they found it, so the three can be chained
//! on one open file. Path-level variants open the file themselves.

use crate::checksum::{Checksum, ChecksumScan, StreamChecksum};
use crate::config::{InspectorConfig, RepairMode};
use crate::error::{Result, SnapshotError};
use crate::header::{checksum_field_offset, read_stored_checksum, Header};
use crate::layout::CHECKSUM_DOMAIN_START;
use crate::position::with_restored_position;
use crate::status::StatusSink;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Stored checksum next to the one recomputed from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub stored: Checksum,
    pub computed: Checksum,
}

impl Verification {
    pub fn is_match(&self) -> bool {
        self.stored == self.computed
    }
}

/// What `repair` replaced and what it wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repair {
    pub previous: Checksum,
    pub written: Checksum,
}

impl Repair {
    pub fn changed(&self) -> bool {
        self.previous != self.written
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotInspector {
    config: InspectorConfig,
    checksum: StreamChecksum,
}

impl SnapshotInspector {
    pub fn new(config: InspectorConfig) -> Self {
        let checksum = StreamChecksum::new(config.read_buffer_size);
        Self { config, checksum }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn describe<S: Read + Seek>(&self, source: &mut S, sink: &mut dyn StatusSink) -> Result<Header> {
        let outcome = self.describe_stream(source, sink);
        report(sink, outcome)
    }

    /// The header is decoded at the current position, so the handle is expected at offset 0.
    /// The payload checksum and `repair` always use absolute offsets.
    pub fn verify<S: Read + Seek>(&self, source: &mut S, sink: &mut dyn StatusSink) -> Result<Verification> {
        let outcome = self.verify_stream(source, sink);
        report(sink, outcome)
    }

    pub fn repair<S: Read + Write + Seek>(&self, target: &mut S, sink: &mut dyn StatusSink) -> Result<Repair> {
        let outcome = self.repair_stream(target, sink);
        report(sink, outcome)
    }

    pub fn describe_path(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<Header> {
        let outcome = self
            .open_for_read(path, sink)
            .and_then(|mut file| self.describe_stream(&mut file, sink));
        report(sink, outcome)
    }

    pub fn verify_path(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<Verification> {
        let outcome = self
            .open_for_read(path, sink)
            .and_then(|mut file| self.verify_stream(&mut file, sink));
        report(sink, outcome)
    }

    /// Rewrites the stored checksum of the file at `path`, as configured by [`RepairMode`].
    pub fn repair_path(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<Repair> {
        let outcome = match self.config.repair_mode {
            RepairMode::InPlace => self.repair_in_place(path, sink),
            RepairMode::AtomicReplace => self.repair_atomically(path, sink),
        };
        report(sink, outcome)
    }

    fn describe_stream<S: Read + Seek>(&self, source: &mut S, sink: &mut dyn StatusSink) -> Result<Header> {
        let header =
            Header::decode(source).map_err(|err| SnapshotError::InvalidHeader(Box::new(err)))?;

        sink.info(&format!("Number of contexts: {}", header.number_of_contexts));
        sink.info(&format!("Rehashability: {}", header.rehashability));
        sink.info(&format!("Checksum: {}", header.checksum));
        sink.info(&format!("Version string: {}", header.version_text()));
        sink.info(&format!("Offset to readonly: {}", header.offset_to_read_only));
        sink.info(&format!("Offset to context 0: {}", header.offset_to_context_0));
        sink.info(&format!("Offset to context 1: {}", header.offset_to_context_1));

        Ok(header)
    }

    fn verify_stream<S: Read + Seek>(&self, source: &mut S, sink: &mut dyn StatusSink) -> Result<Verification> {
        let header = Header::decode(source)?;
        let scan = self.scan_payload(source, sink)?;

        let verification = Verification {
            stored: header.checksum,
            computed: scan.checksum,
        };

        if verification.is_match() {
            sink.success(&format!(
                "Checksum is a match ({} == {})",
                verification.computed, verification.stored
            ));
        } else {
            tracing::warn!(
                stored = %verification.stored,
                computed = %verification.computed,
                "checksum mismatch"
            );
            sink.error(&format!(
                "Checksum does not match ({} != {})",
                verification.computed, verification.stored
            ));
        }

        Ok(verification)
    }

    fn repair_stream<S: Read + Write + Seek>(&self, target: &mut S, sink: &mut dyn StatusSink) -> Result<Repair> {
        let previous = read_stored_checksum(target)?;
        let written = self.scan_payload(target, sink)?.checksum;

        // The payload has been fully hashed; only now is the file touched.
        with_restored_position(target, |t| {
            t.seek(SeekFrom::Start(checksum_field_offset()))?;
            t.write_all(&written.to_le_bytes())?;
            t.flush()?;
            Ok(())
        })?;

        tracing::debug!(%previous, %written, "rewrote stored checksum");
        announce_repair(sink, previous, written);

        Ok(Repair { previous, written })
    }

    fn repair_in_place(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<Repair> {
        self.check_selection(path, sink)?;
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let repair = self.repair_stream(&mut file, sink)?;
        file.sync_data()?;
        Ok(repair)
    }

    /// Hashes the original read-only, then patches a sibling copy and renames it into place.
    fn repair_atomically(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<Repair> {
        let mut original = self.open_for_read(path, sink)?;
        // Rename over the resolved file, not over a symlink pointing at it.
        let path = &fs::canonicalize(path)?;
        let previous = read_stored_checksum(&mut original)?;
        let written = self.scan_payload(&mut original, sink)?.checksum;
        drop(original);

        let staging = staging_path(path);
        if let Err(err) = replace_checksum(path, &staging, written) {
            // Best effort; the original is untouched at this point.
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        tracing::debug!(%previous, %written, staging = %staging.display(), "replaced snapshot");
        announce_repair(sink, previous, written);

        Ok(Repair { previous, written })
    }

    fn scan_payload<S: Read + Seek>(&self, source: &mut S, sink: &mut dyn StatusSink) -> Result<ChecksumScan> {
        let scan = self.checksum.scan(source, CHECKSUM_DOMAIN_START)?;
        if scan.trailing_bytes > 0 {
            tracing::warn!(trailing = scan.trailing_bytes, "payload is not word aligned");
            sink.warning(&format!(
                "Ignored {} trailing byte(s) after the last full 8-byte word",
                scan.trailing_bytes
            ));
        }
        Ok(scan)
    }

    fn open_for_read(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<File> {
        self.check_selection(path, sink)?;
        Ok(File::open(path)?)
    }

    /// Runs before any I/O.
    fn check_selection(&self, path: &Path, sink: &mut dyn StatusSink) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(SnapshotError::NoResourceSelected);
        }

        if let Some(expected) = self.config.expected_extension.as_deref() {
            let matches = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(expected));
            if !matches {
                sink.warning(&format!(
                    "'{}' does not have the .{} extension",
                    path.display(),
                    expected
                ));
            }
        }

        tracing::debug!(path = %path.display(), "selected snapshot");
        Ok(())
    }
}

fn report<T>(sink: &mut dyn StatusSink, outcome: Result<T>) -> Result<T> {
    if let Err(err) = &outcome {
        tracing::debug!(error = %err, "snapshot operation failed");
        sink.error(&err.to_string());
    }
    outcome
}

fn announce_repair(sink: &mut dyn StatusSink, previous: Checksum, written: Checksum) {
    if previous == written {
        sink.info(&format!("Stored checksum was already current ({})", previous));
    } else {
        sink.info(&format!("Previous checksum: {}", previous));
    }
    sink.success(&format!("The checksum was reset successfully ({})", written));
}

/// `<name>.repair.tmp` next to the original, so the rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".repair.tmp");
    path.with_file_name(name)
}

fn replace_checksum(path: &Path, staging: &Path, checksum: Checksum) -> Result<()> {
    fs::copy(path, staging)?;
    {
        let mut file = OpenOptions::new().write(true).open(staging)?;
        file.seek(SeekFrom::Start(checksum_field_offset()))?;
        file.write_all(&checksum.to_le_bytes())?;
        file.sync_all()?;
    }
    fs::rename(staging, path)?;
    Ok(())
}
