/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

use log::{error, info, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use web_time::{SystemTime, UNIX_EPOCH};

/// Destination for the structured log lines the monitor produces.
///
/// The hosting page typically renders these into its log panel; tests assert
/// on them via [`CapturedLogSink`].
pub trait LogSink {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sink that forwards every line to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Milliseconds since the unix epoch at capture time.
    pub at_ms: u64,
    pub severity: Severity,
    pub message: String,
}

/// Sink that keeps every line in memory, for the page's copy-logs affordance
/// and for test assertions. Also forwards to the `log` facade so entries show
/// up on the console.
#[derive(Clone, Default)]
pub struct CapturedLogSink {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl CapturedLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, severity: Severity, message: &str) {
        let at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.entries.borrow_mut().push(LogEntry {
            at_ms,
            severity,
            message: message.to_string(),
        });
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// All captured lines of one severity, message text only.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.severity == severity)
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Render the buffer as exportable text, one line per entry.
    pub fn export(&self) -> String {
        self.entries
            .borrow()
            .iter()
            .map(|entry| format!("[{}] [{}] {}", entry.at_ms, entry.severity, entry.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl LogSink for CapturedLogSink {
    fn info(&self, message: &str) {
        info!("{message}");
        self.push(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
        self.push(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        error!("{message}");
        self.push(Severity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_severities_in_order() {
        let sink = CapturedLogSink::new();
        sink.info("first");
        sink.warn("second");
        sink.error("third");

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].severity, Severity::Info);
        assert_eq!(entries[1].severity, Severity::Warning);
        assert_eq!(entries[2].severity, Severity::Error);
        assert_eq!(sink.messages(Severity::Warning), vec!["second".to_string()]);
    }

    #[test]
    fn export_renders_one_line_per_entry() {
        let sink = CapturedLogSink::new();
        sink.info("hello");
        sink.warn("world");

        let text = sink.export();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[info] hello"));
        assert!(lines[1].contains("[warning] world"));

        sink.clear();
        assert!(sink.entries().is_empty());
    }
}
