// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// No snapshot file was chosen before invoking an operation.
    #[error("You must first select a valid V8 context snapshot")]
    NoResourceSelected,
    #[error("Truncated input: needed {needed} bytes, found {available}")]
    TruncatedInput { needed: usize, available: usize },
    #[error("Invalid header: {0}")]
    InvalidHeader(#[source] Box<SnapshotError>),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl SnapshotError {
    /// Strips `InvalidHeader` wrappers to reach the failure that started it.
    pub fn root(&self) -> &SnapshotError {
        match self {
            SnapshotError::InvalidHeader(inner) => inner.root(),
            other => other,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self.root(), SnapshotError::TruncatedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
