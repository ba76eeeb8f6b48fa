//! Append-only record of error conditions.
//!
//! Records are kept in memory for the session and, when a path is configured,
//! mirrored as JSON lines to a file. Recording never fails: a write error is
//! reported through `tracing` and otherwise ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticEntry {
    pub timestamp: DateTime<Utc>,
    /// Component that observed the condition, e.g. `enhance.positive`.
    pub source: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<DiagnosticEntry>,
    file: Option<PathBuf>,
    surface: bool,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors every record to `path` (appending, created on first write).
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// When set, records are emitted at warn level instead of debug.
    pub fn surfacing(mut self, surface: bool) -> Self {
        self.surface = surface;
        self
    }

    pub fn is_surfacing(&self) -> bool {
        self.surface
    }

    pub fn record(&mut self, source: &str, message: impl Into<String>) {
        let entry = DiagnosticEntry {
            timestamp: Utc::now(),
            source: source.to_string(),
            message: message.into(),
        };

        if self.surface {
            warn!(source = %entry.source, "{}", entry.message);
        } else {
            debug!(source = %entry.source, "{}", entry.message);
        }

        if let Some(path) = &self.file {
            if let Err(e) = append_line(path, &entry) {
                warn!(path = %path.display(), error = %e, "Failed to write diagnostic entry");
            }
        }

        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&DiagnosticEntry> {
        self.entries.last()
    }
}

fn append_line(path: &Path, entry: &DiagnosticEntry) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_appended_in_order() {
        let mut log = DiagnosticLog::new();
        log.record("enhance.positive", "connection refused");
        log.record("enhance.negative", "timeout");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].source, "enhance.positive");
        assert_eq!(log.last().unwrap().message, "timeout");
        assert!(log.entries()[0].timestamp <= log.entries()[1].timestamp);
    }

    #[test]
    fn mirrors_to_file_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnostics.jsonl");
        let mut log = DiagnosticLog::new().with_file(&path);

        log.record("catalog", "row 3 skipped");
        log.record("catalog", "row 7 skipped");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: DiagnosticEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.message, "row 7 skipped");
    }

    #[test]
    fn unwritable_file_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let mut log = DiagnosticLog::new().with_file(dir.path());

        log.record("enhance.positive", "still recorded in memory");
        assert_eq!(log.len(), 1);
    }
}
