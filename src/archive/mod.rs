//! Archive Module
//!
//! Reads the tar snapshot a virtual filesystem is materialized from.
//! Only entry paths and their directory/file kind survive decoding;
//! payload bytes are skipped.

pub mod tar;
#[cfg(test)]
pub(crate) mod testing;

pub use tar::{load_archive, read_archive, ArchiveError};

/// Kind of a single archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a sequential archive: a full path plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl ArchiveEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: EntryKind::Directory }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: EntryKind::File }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
