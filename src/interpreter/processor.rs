//! Command Processor
//!
//! Records a line, splits it into words, dispatches it through the command
//! table and returns the text to show. Rendering is left to the caller.

use tracing::debug;

use super::types::{SessionState, SessionStatus};
use crate::audit::LogEntry;
use crate::commands::{Command, CommandError};
use crate::fs::VirtualFileSystem;
use crate::parser::split_words;

/// A filesystem plus the session state commands act on.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    fs: VirtualFileSystem,
    state: SessionState,
}

impl CommandProcessor {
    pub fn new(fs: VirtualFileSystem) -> Self {
        Self {
            fs,
            state: SessionState::new(),
        }
    }

    /// Process one input line and return its output, possibly empty.
    ///
    /// The line is recorded before anything else happens, so history and
    /// the audit log also hold lines that failed to parse or to run.
    pub fn process(&mut self, line: &str) -> String {
        self.state.record(line);
        match self.dispatch(line) {
            Ok(output) => output,
            Err(err) => {
                debug!(line, error = %err, "command failed");
                err.to_string()
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<String, CommandError> {
        let words = split_words(line)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(String::new());
        };
        let command = Command::parse(name, args)?;
        debug!(command = command.name(), cwd = self.fs.current_path(), "dispatching");
        self.execute(command)
    }

    fn execute(&mut self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::Ls => Ok(self.fs.list_dir()?),
            Command::Cd { path } => {
                self.fs.change_dir(&path)?;
                Ok(String::new())
            }
            Command::Chown { owner, path } => Ok(self.fs.chown(&path, &owner)?),
            Command::History => Ok(self.state.history.join("\n")),
            Command::Exit => {
                self.state.terminate();
                Ok(String::new())
            }
        }
    }

    /// End the session without an `exit` command, e.g. when input runs out.
    pub fn terminate(&mut self) {
        self.state.terminate();
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn fs(&self) -> &VirtualFileSystem {
        &self.fs
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[String] {
        &self.state.history
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.state.log_entries()
    }
}
