// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cursor save/restore around reads that must not move the caller's stream.

use crate::error::Result;
use std::io::{Seek, SeekFrom};

/// Runs `op` and seeks back to the entry position afterwards, on success and on failure.
///
/// When both `op` and the restoring seek fail, the error from `op` wins.
pub(crate) fn with_restored_position<S, T, F>(stream: &mut S, op: F) -> Result<T>
where
    S: Seek + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    let origin = stream.stream_position()?;
    let outcome = op(&mut *stream);
    let restored = stream.seek(SeekFrom::Start(origin));

    let value = outcome?;
    restored?;
    Ok(value)
}

/// Bytes between `from` and the end of the stream. Leaves the cursor untouched.
pub(crate) fn remaining_from<S: Seek + ?Sized>(stream: &mut S, from: u64) -> Result<u64> {
    with_restored_position(stream, |s| {
        let end = s.seek(SeekFrom::End(0))?;
        Ok(end.saturating_sub(from))
    })
}
