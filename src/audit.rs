//! Audit Log
//!
//! Append-only record of every line submitted to the shell, written out
//! as a JSON array of `{"command": ...}` objects when the session ends.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub command: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<LogEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, command: &str) {
        self.entries.push(LogEntry {
            command: command.to_string(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<String, ShellError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }

    /// Overwrite `path` with the whole log.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ShellError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ShellError::LogWrite {
            path: path.display().to_string(),
            source,
        })?;
        info!(log = %path.display(), entries = self.entries.len(), "audit log written");
        Ok(())
    }
}
