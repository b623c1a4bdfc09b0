//! In-Memory Virtual File System
//!
//! Owns the tree built from an archive and the current-directory cursor.
//! All paths may be absolute or relative to the cursor.

use std::path::Path;

use super::tree::{build_tree, path_segments};
use super::types::*;
use crate::archive::{load_archive, ArchiveEntry, ArchiveError};

/// Separator placed between names in a directory listing.
pub const LIST_SEPARATOR: &str = "  ";

/// In-memory virtual file system.
#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    root: FsNode,
    current_path: String,
}

impl VirtualFileSystem {
    /// Create a filesystem over an existing root directory, positioned at `/`.
    pub fn new(root: FsNode) -> Self {
        Self {
            root,
            current_path: "/".to_string(),
        }
    }

    /// Build the tree from already-decoded archive entries.
    pub fn with_entries(entries: &[ArchiveEntry]) -> Self {
        Self::new(build_tree(entries))
    }

    /// Load and decode the archive at `path`. No tree is produced on failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let entries = load_archive(path)?;
        Ok(Self::with_entries(&entries))
    }

    pub fn root(&self) -> &FsNode {
        &self.root
    }

    /// Absolute, normalized path of the current directory.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Resolve `path` against the current directory into an absolute path.
    pub fn resolve(&self, path: &str) -> String {
        normalize_path(&self.current_path, path)
    }

    /// Look up a node by absolute or relative path.
    pub fn lookup(&self, path: &str) -> Option<&FsNode> {
        let absolute = self.resolve(path);
        let mut current = &self.root;
        for part in path_segments(&absolute) {
            current = current.child(part)?;
        }
        Some(current)
    }

    fn lookup_mut(&mut self, path: &str) -> Option<&mut FsNode> {
        let absolute = self.resolve(path);
        let mut current = &mut self.root;
        for part in path_segments(&absolute) {
            current = current.child_mut(part)?;
        }
        Some(current)
    }

    /// Names of the current directory's children, in archive order.
    pub fn list_dir(&self) -> Result<String, FsError> {
        let children = self
            .lookup(&self.current_path)
            .and_then(FsNode::children)
            .ok_or_else(|| FsError::NotADirectory {
                path: self.current_path.clone(),
            })?;
        let names: Vec<&str> = children.keys().map(String::as_str).collect();
        Ok(names.join(LIST_SEPARATOR))
    }

    /// Move the cursor. On error the cursor is left untouched.
    pub fn change_dir(&mut self, path: &str) -> Result<(), FsError> {
        let new_path = self.resolve(path);
        match self.lookup(&new_path) {
            Some(node) if node.is_directory() => {
                self.current_path = new_path;
                Ok(())
            }
            Some(_) => Err(FsError::NotADirectory { path: path.to_string() }),
            None => Err(FsError::NoSuchDirectory { path: path.to_string() }),
        }
    }

    /// Record a new owner on a file or directory.
    pub fn chown(&mut self, path: &str, owner: &str) -> Result<String, FsError> {
        let node = self
            .lookup_mut(path)
            .ok_or_else(|| FsError::NotFound { path: path.to_string() })?;
        node.owner = owner.to_string();
        Ok(format!("Changed owner of {} to {}", path, owner))
    }

    /// Owner of the node at `path`.
    pub fn owner(&self, path: &str) -> Result<&str, FsError> {
        self.lookup(path)
            .map(|node| node.owner.as_str())
            .ok_or_else(|| FsError::NotFound { path: path.to_string() })
    }
}

// ============================================================================
// Path utilities
// ============================================================================

/// Join `path` onto `base` and fold `.`, `..` and repeated separators.
/// The parent of `/` is `/`.
fn normalize_path(base: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}/{}", base, path)
    };
    let mut resolved: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            _ => resolved.push(part),
        }
    }
    if resolved.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", resolved.join("/"))
    }
}

// ============================================================================
// Tests
// ============================================================================
