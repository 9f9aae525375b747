// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! ctxsnap: inspection and checksum repair for V8 context snapshot blobs.
//!
//! The header is a fixed 92-byte little-endian record. Its two checksum
//! words cover every byte from offset 16 to end of file, consumed as
//! 64-bit words by a Fletcher-style pair of running sums.

pub mod checksum;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod header;
pub mod inspector;
pub mod layout;
mod position;
pub mod status;


pub use checksum::{checksum_slice, Checksum, ChecksumScan, StreamChecksum};
pub use config::{InspectorConfig, RepairMode};
pub use error::{Result, SnapshotError};
pub use header::{checksum_field_offset, Header};
pub use inspector::{Repair, SnapshotInspector, Verification};
pub use status::{StatusLevel, StatusLine, StatusLog, StatusSink};
