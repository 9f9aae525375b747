// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Inspector configuration.

/// Buffer used when streaming the payload through the checksum.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Snapshot blobs ship as `*.bin`.
pub const DEFAULT_EXTENSION: &str = "bin";

/// How `repair_path` commits the new checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepairMode {
    /// Seek to the checksum field of the original file and overwrite it.
    InPlace,
    /// Patch a sibling copy, sync it, then rename it over the original.
    #[default]
    AtomicReplace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    pub read_buffer_size: usize,
    pub repair_mode: RepairMode,
    /// Files without this extension draw a warning. `None` disables the check.
    pub expected_extension: Option<String>,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            repair_mode: RepairMode::default(),
            expected_extension: Some(DEFAULT_EXTENSION.to_string()),
        }
    }
}

impl InspectorConfig {
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        // A zero-capacity BufReader would still work but degrades to one syscall per word.
        self.read_buffer_size = size.max(crate::layout::WORD_LEN);
        self
    }

    pub fn with_repair_mode(mut self, mode: RepairMode) -> Self {
        self.repair_mode = mode;
        self
    }

    pub fn with_expected_extension(mut self, extension: Option<&str>) -> Self {
        self.expected_extension = extension.map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InspectorConfig::default();
        assert_eq!(config.read_buffer_size, 64 * 1024);
        assert_eq!(config.repair_mode, RepairMode::AtomicReplace);
        assert_eq!(config.expected_extension.as_deref(), Some("bin"));
    }

    #[test]
    fn test_buffer_size_floor() {
        let config = InspectorConfig::default().with_read_buffer_size(0);
        assert_eq!(config.read_buffer_size, 8);
    }
}
