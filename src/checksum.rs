// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fletcher-64 style payload checksum.
//!
//! Two 64-bit running sums over little-endian u64 words, `a` seeded at 1 and
//! `b` at 0. Each sum is folded to 32 bits (`acc ^ (acc >> 32)`, truncated)
//! once the stream runs out of whole words. A trailing partial word is
//! ignored, never padded.

use crate::config::DEFAULT_READ_BUFFER_SIZE;
use crate::error::Result;
use crate::layout::WORD_LEN;
use crate::position::{remaining_from, with_restored_position};
use byteorder::{LittleEndian, ReadBytesExt};
use core::fmt;
use std::io::{BufReader, Read, Seek, SeekFrom};

/// The pair of folded accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Checksum {
    pub checksum_a: u32,
    pub checksum_b: u32,
}

impl Checksum {
    /// Length of the canonical hex form.
    pub const HEX_LEN: usize = 16;

    pub const fn new(checksum_a: u32, checksum_b: u32) -> Self {
        Self {
            checksum_a,
            checksum_b,
        }
    }

    /// Canonical form: big-endian hex of `a` then `b`, uppercase.
    pub fn to_hex(&self) -> String {
        let mut out = hex::encode_upper(self.checksum_a.to_be_bytes());
        out.push_str(&hex::encode_upper(self.checksum_b.to_be_bytes()));
        out
    }

    /// Parses the canonical form. Either case is accepted.
    pub fn from_hex(text: &str) -> std::result::Result<Self, hex::FromHexError> {
        let mut raw = [0u8; 8];
        hex::decode_to_slice(text, &mut raw)?;
        Ok(Self {
            checksum_a: u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            checksum_b: u32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]),
        })
    }

    /// The 8 bytes exactly as they sit in the header.
    pub fn to_le_bytes(&self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&self.checksum_a.to_le_bytes());
        buf[4..8].copy_from_slice(&self.checksum_b.to_le_bytes());
        buf
    }

    pub fn from_le_bytes(buf: [u8; 8]) -> Self {
        Self {
            checksum_a: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            checksum_b: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Running state before folding.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    a: u64,
    b: u64,
}

impl Accumulator {
    fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    #[inline]
    fn update(&mut self, word: u64) {
        self.a = self.a.wrapping_add(word);
        self.b = self.b.wrapping_add(self.a);
    }

    fn finish(&self) -> Checksum {
        Checksum {
            checksum_a: fold(self.a),
            checksum_b: fold(self.b),
        }
    }
}

#[inline]
fn fold(acc: u64) -> u32 {
    (acc ^ (acc >> 32)) as u32
}

/// Result of streaming a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumScan {
    pub checksum: Checksum,
    /// Whole words folded in.
    pub words: u64,
    /// Bytes after the last whole word that were left out.
    pub trailing_bytes: usize,
}

/// Checksum over an in-memory buffer. Same rules as the streaming path.
pub fn checksum_slice(data: &[u8]) -> Checksum {
    let mut acc = Accumulator::new();
    for chunk in data.chunks_exact(WORD_LEN) {
        let mut word = [0u8; WORD_LEN];
        word.copy_from_slice(chunk);
        acc.update(u64::from_le_bytes(word));
    }
    acc.finish()
}

/// Streams a seekable source through the checksum without moving its cursor.
#[derive(Debug, Clone)]
pub struct StreamChecksum {
    buffer_size: usize,
}

impl Default for StreamChecksum {
    fn default() -> Self {
        Self::new(DEFAULT_READ_BUFFER_SIZE)
    }
}

impl StreamChecksum {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(WORD_LEN),
        }
    }

    pub fn compute<S: Read + Seek>(&self, source: &mut S, start_offset: u64) -> Result<Checksum> {
        Ok(self.scan(source, start_offset)?.checksum)
    }

    /// Like [`compute`](Self::compute), also reporting how much of the stream was covered.
    pub fn scan<S: Read + Seek>(&self, source: &mut S, start_offset: u64) -> Result<ChecksumScan> {
        let available = remaining_from(source, start_offset)?;
        let words = available / WORD_LEN as u64;
        let trailing_bytes = (available % WORD_LEN as u64) as usize;

        let checksum = with_restored_position(source, |s| {
            s.seek(SeekFrom::Start(start_offset))?;
            let mut reader = BufReader::with_capacity(self.buffer_size, s);
            let mut acc = Accumulator::new();
            for _ in 0..words {
                acc.update(reader.read_u64::<LittleEndian>()?);
            }
            Ok(acc.finish())
        })?;

        tracing::debug!(
            start_offset,
            words,
            trailing_bytes,
            checksum = %checksum,
            "computed payload checksum"
        );

        Ok(ChecksumScan {
            checksum,
            words,
            trailing_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_payload_is_seed() {
        let checksum = checksum_slice(&[]);
        assert_eq!(checksum, Checksum::new(1, 0));
        assert_eq!(checksum.to_hex(), "0000000100000000");
    }

    #[test]
    fn test_single_word() {
        let checksum = checksum_slice(&1u64.to_le_bytes());
        assert_eq!(checksum, Checksum::new(2, 2));
        assert_eq!(checksum.to_hex(), "0000000200000002");
    }

    #[test]
    fn test_fold_mixes_high_half() {
        // a = 1 + 0x0000_0005_0000_0000, folds to 5 ^ 1
        let word = 0x0000_0005_0000_0000u64;
        let checksum = checksum_slice(&word.to_le_bytes());
        assert_eq!(checksum.checksum_a, 4);
        assert_eq!(checksum.checksum_b, 4);
    }

    #[test]
    fn test_accumulators_wrap() {
        let mut data = Vec::new();
        data.extend_from_slice(&u64::MAX.to_le_bytes());
        data.extend_from_slice(&u64::MAX.to_le_bytes());
        // a: 1 -> 0 -> u64::MAX, b: 0 -> 0 -> u64::MAX
        assert_eq!(checksum_slice(&data), Checksum::new(0, 0));
    }

    #[test]
    fn test_hex_round_trip_and_case() {
        let checksum = Checksum::new(0xDEADBEEF, 0x0102_0304);
        assert_eq!(checksum.to_hex(), "DEADBEEF01020304");
        assert_eq!(checksum.to_string(), "DEADBEEF01020304");
        assert_eq!(Checksum::from_hex("deadbeef01020304").unwrap(), checksum);
        assert!(Checksum::from_hex("DEADBEEF").is_err());
    }

    #[test]
    fn test_le_bytes_layout() {
        let checksum = Checksum::new(0x0403_0201, 0x0807_0605);
        assert_eq!(checksum.to_le_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Checksum::from_le_bytes([1, 2, 3, 4, 5, 6, 7, 8]), checksum);
    }

    #[test]
    fn test_stream_matches_slice() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096 + 5).collect();
        let mut cursor = Cursor::new(data.clone());

        let scan = StreamChecksum::new(64).scan(&mut cursor, 16).unwrap();
        assert_eq!(scan.checksum, checksum_slice(&data[16..]));
        assert_eq!(scan.words, (4096 + 5 - 16) / 8);
        assert_eq!(scan.trailing_bytes, (4096 + 5 - 16) % 8);
    }

    #[test]
    fn test_start_past_end_yields_seed() {
        let mut cursor = Cursor::new(vec![0xAAu8; 10]);
        let scan = StreamChecksum::default().scan(&mut cursor, 16).unwrap();
        assert_eq!(scan.checksum, Checksum::new(1, 0));
        assert_eq!(scan.words, 0);
        assert_eq!(scan.trailing_bytes, 0);
    }
}
