//! tarsh - a Unix-like shell over a virtual filesystem
//!
//! The filesystem is materialized in memory from a tar snapshot and never
//! touches the real disk. Commands navigate it (`ls`, `cd`), record owners
//! (`chown`), and inspect the session (`history`, `exit`).

pub mod archive;
pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod interpreter;
pub mod parser;
pub mod session;

pub use archive::{ArchiveEntry, EntryKind};
pub use config::Config;
pub use error::ShellError;
pub use fs::{FsError, FsNode, VirtualFileSystem};
pub use interpreter::{CommandProcessor, SessionStatus};
pub use session::{Console, ShellSession, StdConsole};
