//! Interpreter Types
//!
//! Session state threaded through command processing.

use crate::audit::{AuditLog, LogEntry};

/// Lifecycle of a session. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Running,
    Terminated,
}

/// History, audit trail and lifecycle of one shell session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub history: Vec<String>,
    pub audit: AuditLog,
    pub status: SessionStatus,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw input line to both the history and the audit log.
    pub fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
        self.audit.record(line);
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.audit.entries()
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn terminate(&mut self) {
        self.status = SessionStatus::Terminated;
    }
}
