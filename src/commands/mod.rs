//! Commands Module
//!
//! The closed set of commands the shell understands.

pub mod types;

pub use types::{Command, CommandError, CHOWN_USAGE};
