//! In-memory root

use super::{invalid_path, valid_path, FileInfo, FileSystem, OpenedFile};
use chrono::{DateTime, Utc};
use hyper::body::Bytes;
use std::collections::BTreeMap;
use std::io;

/// Files held in memory, keyed by slash-separated path.
///
/// Directories are implicit: any prefix of a stored path opens as a directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, (Bytes, Option<DateTime<Utc>>)>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    #[must_use]
    pub fn with_file(mut self, path: &str, content: impl Into<Bytes>) -> Self {
        self.insert(path, content, None);
        self
    }

    pub fn insert(
        &mut self,
        path: &str,
        content: impl Into<Bytes>,
        modified: Option<DateTime<Utc>>,
    ) {
        self.files
            .insert(path.trim_matches('/').to_string(), (content.into(), modified));
    }

    fn is_dir(&self, path: &str) -> bool {
        if path == "." {
            return true;
        }
        let prefix = format!("{path}/");
        self.files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }
}

impl FileSystem for MemoryFs {
    async fn stat(&self, path: &str) -> io::Result<FileInfo> {
        let file = self.open(path).await?;
        Ok(FileInfo {
            size: file.content.len() as u64,
            modified: file.modified,
            is_dir: file.is_dir,
        })
    }

    async fn open(&self, path: &str) -> io::Result<OpenedFile> {
        if !valid_path(path) {
            return Err(invalid_path(path));
        }
        if let Some((content, modified)) = self.files.get(path) {
            return Ok(OpenedFile::file(content.clone(), *modified));
        }
        if self.is_dir(path) {
            return Ok(OpenedFile::dir(None));
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{path}' not found"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open() {
        let root = MemoryFs::new()
            .with_file("index.html", "<html></html>")
            .with_file("assets/app.js", "console.log(1)");

        let file = root.open("assets/app.js").await.unwrap();
        assert_eq!(&file.content[..], b"console.log(1)");
        assert!(!file.is_dir);

        assert!(root.open("assets").await.unwrap().is_dir);
        assert!(root.open(".").await.unwrap().is_dir);

        let err = root.open("asset").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err = root.open("").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let info = root.stat("assets/app.js").await.unwrap();
        assert_eq!(info.size, 14);
        assert!(root.stat("assets").await.unwrap().is_dir);
    }
}
