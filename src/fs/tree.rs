//! Archive Tree Builder
//!
//! Turns the flat entry list of an archive into the directory tree rooted
//! at `/`. Intermediate directories that the archive never lists are
//! synthesized on the way down.

use tracing::warn;

use super::types::{Children, FsNode, NodeKind};
use crate::archive::{ArchiveEntry, EntryKind};

/// Build the root directory from archive entries, in archive order.
///
/// Duplicate paths resolve as "last entry wins", except that a directory
/// entry never discards an existing directory's children.
pub fn build_tree(entries: &[ArchiveEntry]) -> FsNode {
    let mut root = FsNode::directory();
    for entry in entries {
        insert_entry(&mut root, entry);
    }
    root
}

/// Non-empty path segments, with `.` dropped.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

fn insert_entry(root: &mut FsNode, entry: &ArchiveEntry) {
    let segments = path_segments(&entry.path);
    if segments.contains(&"..") {
        warn!(path = %entry.path, "skipping archive entry that escapes the root");
        return;
    }
    let Some((name, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for part in parents {
        current = children_of(current)
            .entry(part.to_string())
            .or_insert_with(FsNode::directory);
    }

    let children = children_of(current);
    match entry.kind {
        EntryKind::File => {
            children.insert(name.to_string(), FsNode::file());
        }
        EntryKind::Directory => {
            let node = children
                .entry(name.to_string())
                .or_insert_with(FsNode::directory);
            if node.is_file() {
                *node = FsNode::directory();
            }
        }
    }
}

/// Children of `node`; a file standing where a directory is needed is replaced.
fn children_of(node: &mut FsNode) -> &mut Children {
    if node.is_file() {
        *node = FsNode::directory();
    }
    match &mut node.kind {
        NodeKind::Directory { children } => children,
        NodeKind::File => unreachable!("files are replaced before descending"),
    }
}
