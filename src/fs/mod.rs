//! File System Module
//!
//! The virtual filesystem the shell navigates: a tree built once from an
//! archive, plus a current-directory cursor.

pub mod types;
pub mod tree;
pub mod in_memory_fs;

pub use types::*;
pub use tree::build_tree;
pub use in_memory_fs::{VirtualFileSystem, LIST_SEPARATOR};
