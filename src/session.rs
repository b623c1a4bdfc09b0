//! Shell Session
//!
//! Ties the pieces together: configuration, the filesystem loaded from the
//! configured archive, startup-script replay, the interactive loop, and the
//! audit-log flush at teardown.

use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ShellError;
use crate::fs::VirtualFileSystem;
use crate::interpreter::{CommandProcessor, SessionStatus};

/// Where prompts and command output go.
pub trait Console {
    fn write(&mut self, text: &str);
}

/// Console backed by the process's standard output.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
            debug!(error = %e, "console write failed");
        }
    }
}

/// Console that keeps everything written to it.
#[derive(Debug, Default)]
pub struct BufferConsole {
    pub output: String,
}

impl Console for BufferConsole {
    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

pub struct ShellSession<C: Console> {
    config: Config,
    processor: CommandProcessor,
    console: C,
}

impl<C: Console> ShellSession<C> {
    /// Load the configured archive. Fails before any command can run.
    pub fn new(config: Config, console: C) -> Result<Self, ShellError> {
        let fs = VirtualFileSystem::load(&config.vfs_path)?;
        info!(name = %config.computer_name, archive = %config.vfs_path, "session started");
        Ok(Self::with_filesystem(config, fs, console))
    }

    pub fn with_filesystem(config: Config, fs: VirtualFileSystem, console: C) -> Self {
        Self {
            config,
            processor: CommandProcessor::new(fs),
            console,
        }
    }

    /// `<name>:<currentPath>$ `
    pub fn prompt(&self) -> String {
        format!(
            "{}:{}$ ",
            self.config.computer_name,
            self.processor.fs().current_path()
        )
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn status(&self) -> SessionStatus {
        self.processor.status()
    }

    fn execute(&mut self, line: &str) {
        let output = self.processor.process(line);
        if !output.is_empty() {
            self.console.write(&output);
            self.console.write("\n");
        }
    }

    /// Replay the startup script, echoing each line after a prompt.
    /// Blank lines are skipped; replay stops once the session terminates.
    /// An unreadable script is skipped with a warning.
    pub fn run_startup_script(&mut self) {
        let path = self.config.startup_script.clone();
        let script = match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(script = %path, error = %e, "startup script not run");
                return;
            }
        };

        let mut replayed = 0;
        for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let echo = format!("{}{}\n", self.prompt(), line);
            self.console.write(&echo);
            self.execute(line);
            replayed += 1;
            if !self.processor.is_running() {
                break;
            }
        }
        info!(script = %path, lines = replayed, "startup script replayed");
    }

    /// Replay the startup script, then show the first interactive prompt.
    pub fn start(&mut self) {
        self.run_startup_script();
        if self.processor.is_running() {
            let prompt = self.prompt();
            self.console.write(&prompt);
        }
    }

    /// Process one interactive line and prompt again while still running.
    pub fn handle_line(&mut self, line: &str) -> SessionStatus {
        self.execute(line);
        let status = self.processor.status();
        if status == SessionStatus::Running {
            let prompt = self.prompt();
            self.console.write(&prompt);
        }
        status
    }

    /// Drive the whole session from `input` until `exit` or end of input,
    /// then flush the audit log. Invalid UTF-8 is replaced, not rejected.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<(), ShellError> {
        self.start();
        while self.processor.is_running() {
            match read_line(&mut input) {
                Ok(Some(line)) => {
                    self.handle_line(&line);
                }
                Ok(None) => {
                    self.console.write("\n");
                    break;
                }
                Err(e) => {
                    self.shutdown()?;
                    return Err(ShellError::Input(e));
                }
            }
        }
        self.shutdown()
    }

    /// Terminate the session and write the audit log.
    pub fn shutdown(&mut self) -> Result<(), ShellError> {
        self.processor.terminate();
        self.processor.state().audit.save(&self.config.log_file)
    }
}

/// Next line without its `\n` or `\r\n` terminator; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Ok(Some(String::from_utf8_lossy(line).into_owned()))
}
