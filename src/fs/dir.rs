//! On-disk directory root

use super::{invalid_path, valid_path, FileInfo, FileSystem, OpenedFile};
use crate::logger;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files under a directory on the local disk.
///
/// Symlinks are followed but the resolved target must stay inside the root.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Open a directory root. Fails if the directory does not exist.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        if !valid_path(name) || name.contains(['\\', '\0']) {
            return Err(invalid_path(name));
        }

        let joined = if name == "." {
            self.root.clone()
        } else {
            self.root.join(name)
        };

        let canonical = fs::canonicalize(&joined).await?;
        if !canonical.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {name} -> {}",
                canonical.display()
            ));
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("'{name}' resolves outside the root"),
            ));
        }
        Ok(canonical)
    }
}

impl FileSystem for DirFs {
    async fn stat(&self, path: &str) -> io::Result<FileInfo> {
        let full_path = self.resolve(path).await?;
        let metadata = fs::metadata(&full_path).await?;
        Ok(FileInfo {
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            is_dir: metadata.is_dir(),
        })
    }

    async fn open(&self, path: &str) -> io::Result<OpenedFile> {
        let full_path = self.resolve(path).await?;
        let metadata = fs::metadata(&full_path).await?;
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

        if metadata.is_dir() {
            return Ok(OpenedFile::dir(modified));
        }

        let content = fs::read(&full_path).await?;
        Ok(OpenedFile::file(content, modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_open_file() {
        let dir = create_root();
        let root = DirFs::new(dir.path()).unwrap();

        let file = root.open("assets/app.js").await.unwrap();
        assert!(!file.is_dir);
        assert_eq!(&file.content[..], b"console.log(1)");
        assert!(file.modified.is_some());
    }

    #[tokio::test]
    async fn test_open_directory() {
        let dir = create_root();
        let root = DirFs::new(dir.path()).unwrap();

        assert!(root.open("assets").await.unwrap().is_dir);
        assert!(root.open(".").await.unwrap().is_dir);
    }

    #[tokio::test]
    async fn test_open_missing_and_invalid() {
        let dir = create_root();
        let root = DirFs::new(dir.path()).unwrap();

        let err = root.open("missing.png").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err = root.open("").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = root.open("../index.html").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_stat() {
        let dir = create_root();
        let root = DirFs::new(dir.path()).unwrap();

        let info = root.stat("assets/app.js").await.unwrap();
        assert_eq!(info.size, 14);
        assert!(!info.is_dir);
        assert!(info.modified.is_some());

        assert!(root.stat("assets").await.unwrap().is_dir);
        assert_eq!(
            root.stat("missing.png").await.unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert_eq!(
            root.stat("").await.unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stat_does_not_read_content() {
        use std::os::unix::fs::PermissionsExt;

        let dir = create_root();
        let fifo = dir.path().join("stream.bin");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let locked = dir.path().join("locked.txt");
        std::fs::write(&locked, "secret").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        let root = DirFs::new(dir.path()).unwrap();

        // a FIFO with no writer would block any read
        let info = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            root.stat("stream.bin"),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(!info.is_dir);

        assert_eq!(root.stat("locked.txt").await.unwrap().size, 6);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let dir = create_root();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("link.txt"),
        )
        .unwrap();

        let root = DirFs::new(dir.path()).unwrap();
        let err = root.open("link.txt").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_missing_root() {
        assert!(DirFs::new("/definitely/not/here").is_err());
    }
}
