//! Shell Errors
//!
//! Errors that end the program. Per-command failures never reach this
//! level; they are reported as command output instead.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("cannot read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("cannot write log '{path}': {source}")]
    LogWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode log: {0}")]
    LogEncode(#[from] serde_json::Error),
}
