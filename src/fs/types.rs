//! Virtual Filesystem Types
//!
//! Nodes of the in-memory tree and the errors path operations report.

use indexmap::IndexMap;
use thiserror::Error;

/// Owner recorded on every node created from an archive.
pub const SUPERUSER: &str = "root";

/// Path errors. The display text is what the user sees, with `path`
/// exactly as it was typed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("No such directory: {path}")]
    NoSuchDirectory { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("No such file or directory: {path}")]
    NotFound { path: String },
}

/// Directory children, keyed by name in archive insertion order.
pub type Children = IndexMap<String, FsNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory { children: Children },
    File,
}

/// A directory or a file. Only directories own children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsNode {
    pub owner: String,
    pub kind: NodeKind,
}

impl FsNode {
    /// Empty directory owned by the superuser.
    pub fn directory() -> Self {
        Self {
            owner: SUPERUSER.to_string(),
            kind: NodeKind::Directory { children: Children::new() },
        }
    }

    /// File owned by the superuser.
    pub fn file() -> Self {
        Self {
            owner: SUPERUSER.to_string(),
            kind: NodeKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    pub fn children(&self) -> Option<&Children> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&FsNode> {
        self.children()?.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FsNode> {
        self.children_mut()?.get_mut(name)
    }
}
