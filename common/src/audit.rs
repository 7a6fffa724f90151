//! # Audit Log
//!
//! Append-only record of everything a distribution run does. Each entry is one
//! line of the form
//!
//! ```text
//! 2026-10-18T09:12:44.031Z - WARNING: [base] token DEMO has no deployment record, skipping
//! ```
//!
//! The file is opened in append mode and is never truncated. Every entry is
//! flushed before [`AuditLog::record`] returns and is mirrored to the terminal
//! as a `tracing` event.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::error::ScatterError;

/// Severity/category prefix of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Info,
    Warning,
    Error,
    ErrorTransfer,
    ErrorNetworkInteraction,
    Success,
    FatalError,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Info => "INFO",
            Tag::Warning => "WARNING",
            Tag::Error => "ERROR",
            Tag::ErrorTransfer => "ERROR_TRANSFER",
            Tag::ErrorNetworkInteraction => "ERROR_NETWORK_INTERACTION",
            Tag::Success => "SUCCESS",
            Tag::FatalError => "FATAL_ERROR",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Tag::Error | Tag::ErrorTransfer | Tag::ErrorNetworkInteraction | Tag::FatalError
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Tag::Info),
            "WARNING" => Ok(Tag::Warning),
            "ERROR" => Ok(Tag::Error),
            "ERROR_TRANSFER" => Ok(Tag::ErrorTransfer),
            "ERROR_NETWORK_INTERACTION" => Ok(Tag::ErrorNetworkInteraction),
            "SUCCESS" => Ok(Tag::Success),
            "FATAL_ERROR" => Ok(Tag::FatalError),
            other => Err(format!("unknown audit tag: {other}")),
        }
    }
}

/// A single parsed line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub tag: Tag,
    pub message: String,
}

impl AuditEntry {
    /// Parses a line previously written by [`AuditLog::record`].
    pub fn parse(line: &str) -> Option<Self> {
        let (stamp, rest) = line.split_once(" - ")?;
        let (tag, message) = rest.split_once(": ")?;
        Some(Self {
            timestamp: DateTime::parse_from_rfc3339(stamp).ok()?.with_timezone(&Utc),
            tag: tag.parse().ok()?,
            message: message.to_string(),
        })
    }
}

pub struct AuditLog {
    path: PathBuf,
    sink: File,
}

impl AuditLog {
    /// Opens (or creates) the log at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScatterError> {
        let path = path.as_ref().to_path_buf();
        let sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ScatterError::AuditLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, sink })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped entry and mirrors it to the terminal.
    pub fn record(&mut self, tag: Tag, message: impl AsRef<str>) -> Result<(), ScatterError> {
        let message = message.as_ref();
        mirror(tag, message);

        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        writeln!(self.sink, "{stamp} - {tag}: {message}")
            .and_then(|_| self.sink.flush())
            .map_err(|source| ScatterError::AuditLog {
                path: self.path.clone(),
                source,
            })
    }

    pub fn info(&mut self, message: impl AsRef<str>) -> Result<(), ScatterError> {
        self.record(Tag::Info, message)
    }

    pub fn warning(&mut self, message: impl AsRef<str>) -> Result<(), ScatterError> {
        self.record(Tag::Warning, message)
    }

    pub fn error(&mut self, message: impl AsRef<str>) -> Result<(), ScatterError> {
        self.record(Tag::Error, message)
    }
}

fn mirror(tag: Tag, message: &str) {
    match tag {
        Tag::Info => info!(target: "scatter::audit", "{message}"),
        Tag::Success => crate::success!("{message}"),
        Tag::Warning => warn!(target: "scatter::audit", "{message}"),
        _ => error!(target: "scatter::audit", tag = tag.as_str(), "{message}"),
    }
}

/// Reads every well-formed entry of the log at `path`.
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<AuditEntry>, ScatterError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw.lines().filter_map(AuditEntry::parse).collect())
}
