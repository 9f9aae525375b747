// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Leveled status lines handed to whatever front end hosts the inspector.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl StatusLevel {
    pub fn label(self) -> &'static str {
        match self {
            StatusLevel::Info => "INFO",
            StatusLevel::Warning => "WARNING",
            StatusLevel::Error => "ERROR",
            StatusLevel::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub message: String,
}

/// Receives human readable progress and outcome lines.
pub trait StatusSink {
    fn emit(&mut self, level: StatusLevel, message: &str);

    fn info(&mut self, message: &str) {
        self.emit(StatusLevel::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.emit(StatusLevel::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.emit(StatusLevel::Error, message);
    }

    fn success(&mut self, message: &str) {
        self.emit(StatusLevel::Success, message);
    }
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn emit(&mut self, level: StatusLevel, message: &str) {
        (**self).emit(level, message);
    }
}

/// Collects every line in memory.
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    lines: Vec<StatusLine>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[StatusLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<StatusLine> {
        self.lines
    }

    pub fn messages(&self, level: StatusLevel) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |line| line.level == level)
            .map(|line| line.message.as_str())
    }

    pub fn count(&self, level: StatusLevel) -> usize {
        self.messages(level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(StatusLevel::Error) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl StatusSink for StatusLog {
    fn emit(&mut self, level: StatusLevel, message: &str) {
        self.lines.push(StatusLine {
            level,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_route_to_levels() {
        let mut log = StatusLog::new();
        log.info("a");
        log.warning("b");
        log.error("c");
        log.success("d");

        let levels: Vec<_> = log.lines().iter().map(|l| l.level).collect();
        assert_eq!(
            levels,
            vec![
                StatusLevel::Info,
                StatusLevel::Warning,
                StatusLevel::Error,
                StatusLevel::Success
            ]
        );
        assert!(log.has_errors());
        assert_eq!(log.messages(StatusLevel::Error).collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        fn shout(mut sink: impl StatusSink) {
            sink.info("forwarded");
        }

        let mut log = StatusLog::new();
        shout(&mut log);
        assert_eq!(log.count(StatusLevel::Info), 1);
    }
}
