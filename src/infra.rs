//! Filesystem abstraction.
//!
//! Table storage, configuration loading and transcript reading all go through
//! [`FileSystem`], so tests can substitute an in-memory implementation.

use std::io;
use std::path::Path;

/// Trait for abstracting filesystem operations.
pub trait FileSystem {
    /// Create a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a slice of bytes to a file, replacing any previous contents.
    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()>;

    /// Rename a file, replacing the destination if it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Real filesystem implementation that delegates to std::fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

impl<FS: FileSystem> FileSystem for &FS {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        (**self).write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_write_then_read_returns_contents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("file.txt");

        RealFileSystem
            .create_dir_all(path.parent().unwrap())
            .unwrap();
        RealFileSystem.write(&path, "hello").unwrap();

        assert_eq!(RealFileSystem.read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_real_fs_rename_replaces_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let from = temp_dir.path().join("a.tmp");
        let to = temp_dir.path().join("a.json");
        std::fs::write(&from, "new").unwrap();
        std::fs::write(&to, "old").unwrap();

        RealFileSystem.rename(&from, &to).unwrap();

        assert_eq!(std::fs::read_to_string(&to).unwrap(), "new");
        assert!(!from.exists());
    }

    #[test]
    fn test_real_fs_missing_file_reports_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = RealFileSystem
            .read_to_string(&temp_dir.path().join("absent"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
