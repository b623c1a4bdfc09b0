//! Interpreter Module
//!
//! Turns input lines into filesystem operations and session effects.

pub mod types;
pub mod processor;

pub use types::{SessionState, SessionStatus};
pub use processor::CommandProcessor;
