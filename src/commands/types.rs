// src/commands/types.rs
use thiserror::Error;

use crate::fs::FsError;
use crate::parser::LexerError;

pub const CHOWN_USAGE: &str = "chown owner file";

/// Per-command failures. Every one of these is shown to the user as
/// plain output; none of them ends the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("parse error: {0}")]
    Parse(#[from] LexerError),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}: command not found")]
    NotFound(String),

    #[error(transparent)]
    Path(#[from] FsError),
}

/// The fixed command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls,
    Cd { path: String },
    Chown { owner: String, path: String },
    History,
    Exit,
}

impl Command {
    /// Resolve a command name and its positional arguments. Surplus
    /// arguments are ignored.
    pub fn parse(name: &str, args: &[String]) -> Result<Self, CommandError> {
        match name {
            "ls" => Ok(Command::Ls),
            "cd" => Ok(Command::Cd {
                path: args.first().cloned().unwrap_or_else(|| "/".to_string()),
            }),
            "chown" => match args {
                [owner, path, ..] => Ok(Command::Chown {
                    owner: owner.clone(),
                    path: path.clone(),
                }),
                _ => Err(CommandError::Usage(CHOWN_USAGE)),
            },
            "history" => Ok(Command::History),
            "exit" => Ok(Command::Exit),
            other => Err(CommandError::NotFound(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Ls => "ls",
            Command::Cd { .. } => "cd",
            Command::Chown { .. } => "chown",
            Command::History => "history",
            Command::Exit => "exit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(Command::parse("ls", &[]).unwrap(), Command::Ls);
        assert_eq!(Command::parse("ls", &args(&["-la"])).unwrap(), Command::Ls);
        assert_eq!(Command::parse("history", &[]).unwrap(), Command::History);
        assert_eq!(Command::parse("exit", &[]).unwrap(), Command::Exit);
    }

    #[test]
    fn test_cd_defaults_to_root() {
        assert_eq!(Command::parse("cd", &[]).unwrap(), Command::Cd { path: "/".to_string() });
        let cmd = Command::parse("cd", &args(&["dir1", "ignored"])).unwrap();
        assert_eq!(cmd, Command::Cd { path: "dir1".to_string() });
    }

    #[test]
    fn test_chown_argument_order() {
        let cmd = Command::parse("chown", &args(&["newuser", "file2.txt"])).unwrap();
        assert_eq!(
            cmd,
            Command::Chown { owner: "newuser".to_string(), path: "file2.txt".to_string() }
        );
        assert_eq!(cmd.name(), "chown");
    }

    #[test]
    fn test_chown_usage() {
        let err = Command::parse("chown", &args(&["onlyonearg"])).unwrap_err();
        assert_eq!(err.to_string(), "Usage: chown owner file");
        assert!(Command::parse("chown", &[]).is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("foobar", &args(&["x"])).unwrap_err();
        assert_eq!(err, CommandError::NotFound("foobar".to_string()));
        assert_eq!(err.to_string(), "foobar: command not found");
    }

    #[test]
    fn test_command_names_are_case_sensitive() {
        assert!(Command::parse("LS", &[]).is_err());
    }

    #[test]
    fn test_path_error_passes_through() {
        let err = CommandError::from(FsError::NoSuchDirectory { path: "x".to_string() });
        assert_eq!(err.to_string(), "No such directory: x");
    }
}
