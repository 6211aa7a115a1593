//! Log records emitted by the pipeline stages.
//!
//! Stages never touch a global logger directly. They receive a [`Reporter`]
//! and write INFO/ERROR records through it. [`TracingReporter`] forwards to
//! `tracing`, which [`init_logging`] wires to an append-only log file;
//! [`MemoryReporter`] keeps records in memory for inspection.

use std::cell::RefCell;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogLevel {
    Info,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Sink for pipeline log records
pub trait Reporter {
    fn record(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

/// Forwards records to the `tracing` subscriber installed for the process
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// A record captured by [`MemoryReporter`]
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
            self.level,
            self.message
        )
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: RefCell<Vec<LogEntry>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Messages at the given level, in order
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Whether any record at `level` contains `needle`
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries.borrow().last().cloned()
    }
}

impl Reporter for MemoryReporter {
    fn record(&self, level: LogLevel, message: &str) {
        self.entries.borrow_mut().push(LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
        });
    }
}

/// Install the process-wide subscriber appending to `log_file`.
///
/// The file is opened once in append mode and never rotated. Hold the
/// returned guard for the life of the process; dropping it flushes pending
/// records.
pub fn init_logging(log_file: &Path) -> Result<WorkerGuard> {
    let directory = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid log file path: {}", log_file.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        reporter.info("first");
        reporter.error("second");
        reporter.info("third");

        assert_eq!(reporter.messages(LogLevel::Info), vec!["first", "third"]);
        assert_eq!(reporter.messages(LogLevel::Error), vec!["second"]);
        assert!(reporter.contains(LogLevel::Error, "sec"));
        assert!(!reporter.contains(LogLevel::Info, "second"));
        assert_eq!(reporter.last().map(|e| e.message), Some("third".to_string()));
    }

    #[test]
    fn test_entry_display_has_level() {
        let reporter = MemoryReporter::new();
        reporter.error("boom");
        let line = reporter.entries()[0].to_string();
        assert!(line.ends_with(" - ERROR - boom"));
    }
}
