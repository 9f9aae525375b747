use chrono::{DateTime, Local};
use ctxsnap::{StatusLevel, StatusSink};
use std::io::{self, Write};

/// `[hh:mm:ss] LEVEL message`, 12-hour clock.
pub fn format_line(at: DateTime<Local>, level: StatusLevel, message: &str) -> String {
    format!("[{}] {:<7} {}", at.format("%I:%M:%S"), level.label(), message)
}

/// Prints status lines as they arrive. Errors and warnings go to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    quiet_info: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses info lines; outcome lines still print.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet_info = quiet;
        self
    }
}

impl StatusSink for ConsoleSink {
    fn emit(&mut self, level: StatusLevel, message: &str) {
        if self.quiet_info && level == StatusLevel::Info {
            return;
        }

        let line = format_line(Local::now(), level, message);
        // A closed pipe should not abort the operation that is reporting.
        let _ = match level {
            StatusLevel::Error | StatusLevel::Warning => writeln!(io::stderr().lock(), "{line}"),
            StatusLevel::Info | StatusLevel::Success => writeln!(io::stdout().lock(), "{line}"),
        };
    }
}
