use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event log entry (JSONL)
// ---------------------------------------------------------------------------

/// What produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A status poll completed (or failed).
    Poll,
    /// A domain/user mutation was sent.
    Command,
    /// Alerts were dismissed locally.
    Dismiss,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poll => write!(f, "poll"),
            Self::Command => write!(f, "command"),
            Self::Dismiss => write!(f, "dismiss"),
        }
    }
}

/// A single line of `~/.infractl/events.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub timestamp: String,
    pub kind: EventKind,
    pub detail: String,
    #[serde(default = "default_true")]
    pub success: bool,
    /// Round-trip time of the request, when one was made.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL event log.
///
/// All writes are best-effort; a full disk or missing home directory never
/// interrupts polling.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: crate::config::expand_tilde(&config.path),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Log a poll result.
    pub fn poll(&self, success: bool, detail: &str, latency_ms: u64) {
        self.record(EventKind::Poll, detail, success, Some(latency_ms));
    }

    /// Log a mutation result.
    pub fn command(&self, detail: &str, success: bool) {
        self.record(EventKind::Command, detail, success, None);
    }

    /// Log a local alert dismissal.
    pub fn dismiss(&self, count: usize) {
        self.record(
            EventKind::Dismiss,
            &format!("dismissed {count} alert(s)"),
            true,
            None,
        );
    }

    fn record(&self, kind: EventKind, detail: &str, success: bool, latency_ms: Option<u64>) {
        let entry = EventEntry {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            detail: detail.to_string(),
            success,
            latency_ms,
        };
        let _ = self.append(&entry);
    }

    fn append(&self, entry: &EventEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Read every entry. Malformed lines are skipped; a missing file reads
    /// as empty.
    pub fn read_all(&self) -> Vec<EventEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str::<EventEntry>(&line).ok())
            .collect()
    }

    /// The last `limit` entries, oldest first.
    pub fn read_recent(&self, limit: usize) -> Vec<EventEntry> {
        let mut entries = self.read_all();
        let excess = entries.len().saturating_sub(limit);
        entries.drain(..excess);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_writes_nothing() {
        let log = EventLog::from_config(&LoggingConfig {
            enabled: false,
            path: "/nonexistent/events.jsonl".to_string(),
        });
        log.poll(true, "ok", 3);
        assert!(log.path().is_none());
        assert!(log.read_all().is_empty());
    }

    #[test]
    fn entries_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::at(dir.path().join("logs").join("events.jsonl"));

        log.poll(true, "4 servers, 1 alert", 12);
        log.poll(false, "network error: connection refused", 3);
        log.command("create domain example.com", true);
        log.dismiss(2);

        let entries = log.read_all();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].kind, EventKind::Poll);
        assert_eq!(entries[0].latency_ms, Some(12));
        assert!(!entries[1].success);
        assert_eq!(entries[2].latency_ms, None);
        assert_eq!(entries[3].detail, "dismissed 2 alert(s)");
    }

    #[test]
    fn read_recent_keeps_tail() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::at(dir.path().join("events.jsonl"));
        for i in 0..5 {
            log.command(&format!("cmd {i}"), true);
        }

        let recent = log.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].detail, "cmd 3");
        assert_eq!(recent[1].detail, "cmd 4");
        assert_eq!(log.read_recent(50).len(), 5);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        fs::write(
            &path,
            "garbage\n{\"timestamp\":\"t\",\"kind\":\"poll\",\"detail\":\"ok\"}\n",
        )
        .unwrap();

        let entries = EventLog::at(&path).read_all();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
    }
}
