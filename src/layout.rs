// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed on-disk layout of the context snapshot header.
//!
//! All integers are little-endian.
//!
//! ```text
//! 0    number_of_contexts   u32
//! 4    rehashability        u32
//! 8    checksum_a           u32
//! 12   checksum_b           u32
//! 16   version_string       [u8; 64], NUL padded
//! 80   offset_to_read_only  u32
//! 84   offset_to_context_0  u32
//! 88   offset_to_context_1  u32
//! ```

use core::ops::Range;

pub const NUMBER_OF_CONTEXTS_RANGE: Range<usize> = 0..4;
pub const REHASHABILITY_RANGE: Range<usize> = 4..8;
pub const CHECKSUM_A_RANGE: Range<usize> = 8..12;
pub const CHECKSUM_B_RANGE: Range<usize> = 12..16;
pub const VERSION_RANGE: Range<usize> = 16..80;
pub const OFFSET_TO_READ_ONLY_RANGE: Range<usize> = 80..84;
pub const OFFSET_TO_CONTEXT_0_RANGE: Range<usize> = 84..88;
pub const OFFSET_TO_CONTEXT_1_RANGE: Range<usize> = 88..92;

/// Total header length. The last field ends at byte 92.
pub const HEADER_LEN: usize = OFFSET_TO_CONTEXT_1_RANGE.end;

/// Width of the NUL padded version buffer.
pub const VERSION_LEN: usize = VERSION_RANGE.end - VERSION_RANGE.start;

/// Absolute offset of `checksum_a`; `checksum_b` follows immediately.
pub const CHECKSUM_OFFSET: u64 = CHECKSUM_A_RANGE.start as u64;

/// Both checksum words, as stored.
pub const CHECKSUM_LEN: usize = CHECKSUM_B_RANGE.end - CHECKSUM_A_RANGE.start;

/// First byte covered by the payload checksum. Everything from here to EOF is hashed.
pub const CHECKSUM_DOMAIN_START: u64 = CHECKSUM_B_RANGE.end as u64;

/// The checksum consumes the payload in 64-bit little-endian words.
pub const WORD_LEN: usize = 8;
