//! Filesystem capability
//!
//! The handler only needs one operation from its root: open a file by a
//! slash-separated relative path. Two roots are provided, a directory on disk
//! and an in-memory map for embedding assets or for tests.

mod dir;
mod memory;

pub use dir::DirFs;
pub use memory::MemoryFs;

use chrono::{DateTime, Utc};
use hyper::body::Bytes;
use std::future::Future;
use std::io;

/// A successfully opened entry of a [`FileSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    /// File content, empty for directories
    pub content: Bytes,
    /// Last modification time, if the root tracks one
    pub modified: Option<DateTime<Utc>>,
    pub is_dir: bool,
}

impl OpenedFile {
    pub fn file(content: impl Into<Bytes>, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            content: content.into(),
            modified,
            is_dir: false,
        }
    }

    pub const fn dir(modified: Option<DateTime<Utc>>) -> Self {
        Self {
            content: Bytes::new(),
            modified,
            is_dir: true,
        }
    }
}

/// Metadata of an entry, without its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub is_dir: bool,
}

/// Read-only filesystem rooted somewhere.
///
/// Both operations must be free of side effects. The handler checks existence
/// with `stat` and reads content with `open` only when it serves the file.
pub trait FileSystem: Send + Sync {
    /// Look up an entry without reading it
    fn stat(&self, path: &str) -> impl Future<Output = io::Result<FileInfo>> + Send;

    fn open(&self, path: &str) -> impl Future<Output = io::Result<OpenedFile>> + Send;
}

/// Check a name against the rules for filesystem paths:
/// unrooted, slash-separated, no empty, `.` or `..` elements.
/// The single name `.` refers to the root itself.
pub fn valid_path(name: &str) -> bool {
    if name == "." {
        return true;
    }
    !name.is_empty()
        && name
            .split('/')
            .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

pub(crate) fn invalid_path(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("invalid path '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_path() {
        assert!(valid_path("."));
        assert!(valid_path("index.html"));
        assert!(valid_path("assets/app.js"));

        assert!(!valid_path(""));
        assert!(!valid_path("/etc/passwd"));
        assert!(!valid_path("assets/"));
        assert!(!valid_path("a//b"));
        assert!(!valid_path("./a"));
        assert!(!valid_path("a/../b"));
        assert!(!valid_path(".."));
    }
}
