// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Header decoding and encoding.

use crate::checksum::Checksum;
use crate::error::{Result, SnapshotError};
use crate::layout::{
    CHECKSUM_LEN, CHECKSUM_OFFSET, HEADER_LEN, OFFSET_TO_CONTEXT_0_RANGE,
    OFFSET_TO_CONTEXT_1_RANGE, OFFSET_TO_READ_ONLY_RANGE, VERSION_LEN, VERSION_RANGE,
};
use crate::position::with_restored_position;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub number_of_contexts: u32,
    pub rehashability: u32,
    pub checksum: Checksum,
    /// Raw version bytes with the trailing NUL padding removed.
    pub version: Vec<u8>,
    pub offset_to_read_only: u32,
    pub offset_to_context_0: u32,
    pub offset_to_context_1: u32,
}

impl Header {
    pub const SIZE: usize = HEADER_LEN;

    /// Peeks the header at the current position. The cursor is left where it was.
    pub fn decode<S: Read + Seek + ?Sized>(source: &mut S) -> Result<Self> {
        with_restored_position(source, |s| Self::read_from(s))
    }

    /// Consumes the header from `reader`.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        reader.take(Self::SIZE as u64).read_to_end(&mut buf)?;
        if buf.len() < Self::SIZE {
            return Err(SnapshotError::TruncatedInput {
                needed: Self::SIZE,
                available: buf.len(),
            });
        }

        let mut cursor = Cursor::new(&buf[..]);
        let number_of_contexts = cursor.read_u32::<LittleEndian>()?;
        let rehashability = cursor.read_u32::<LittleEndian>()?;
        let checksum_a = cursor.read_u32::<LittleEndian>()?;
        let checksum_b = cursor.read_u32::<LittleEndian>()?;

        let header = Self {
            number_of_contexts,
            rehashability,
            checksum: Checksum::new(checksum_a, checksum_b),
            version: trim_nul_padding(&buf[VERSION_RANGE]).to_vec(),
            offset_to_read_only: LittleEndian::read_u32(&buf[OFFSET_TO_READ_ONLY_RANGE]),
            offset_to_context_0: LittleEndian::read_u32(&buf[OFFSET_TO_CONTEXT_0_RANGE]),
            offset_to_context_1: LittleEndian::read_u32(&buf[OFFSET_TO_CONTEXT_1_RANGE]),
        };

        tracing::debug!(
            contexts = header.number_of_contexts,
            checksum = %header.checksum,
            "decoded snapshot header"
        );

        Ok(header)
    }

    /// Fixed layout bytes. Version bytes beyond 64 are cut off.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_u32(&mut buf[0..4], self.number_of_contexts);
        LittleEndian::write_u32(&mut buf[4..8], self.rehashability);
        buf[8..16].copy_from_slice(&self.checksum.to_le_bytes());

        let len = self.version.len().min(VERSION_LEN);
        buf[VERSION_RANGE.start..VERSION_RANGE.start + len].copy_from_slice(&self.version[..len]);

        LittleEndian::write_u32(&mut buf[OFFSET_TO_READ_ONLY_RANGE], self.offset_to_read_only);
        LittleEndian::write_u32(&mut buf[OFFSET_TO_CONTEXT_0_RANGE], self.offset_to_context_0);
        LittleEndian::write_u32(&mut buf[OFFSET_TO_CONTEXT_1_RANGE], self.offset_to_context_1);
        buf
    }

    /// Version bytes read as ISO-8859-1, which maps every byte to one char.
    pub fn version_text(&self) -> String {
        self.version.iter().map(|&b| char::from(b)).collect()
    }
}

/// Where the two checksum words live, relative to the start of the stream.
pub const fn checksum_field_offset() -> u64 {
    CHECKSUM_OFFSET
}

/// Reads just the stored checksum words. Only the first 16 bytes need to exist.
pub fn read_stored_checksum<S: Read + Seek + ?Sized>(source: &mut S) -> Result<Checksum> {
    let needed = CHECKSUM_OFFSET as usize + CHECKSUM_LEN;
    with_restored_position(source, |s| {
        s.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(needed);
        s.take(needed as u64).read_to_end(&mut buf)?;
        if buf.len() < needed {
            return Err(SnapshotError::TruncatedInput {
                needed,
                available: buf.len(),
            });
        }
        let mut raw = [0u8; CHECKSUM_LEN];
        raw.copy_from_slice(&buf[CHECKSUM_OFFSET as usize..]);
        Ok(Checksum::from_le_bytes(raw))
    })
}

/// Drops trailing NULs only. Embedded NULs stay.
fn trim_nul_padding(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &raw[..end]
}
