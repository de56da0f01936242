//! Filesystem abstraction
//!
//! The store only touches disk through this trait so tests can inject
//! failures (full disk, permission denied) without real faulty media.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Size and modification time of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub len: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Primitive file operations the store is built on
pub trait FileSystem: Send + Sync {
    /// Read a whole file; `Ok(None)` if it does not exist
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Create or truncate a file, write `bytes`, and sync it to disk
    fn write_synced(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Atomically replace `to` with `from`
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Files directly inside `dir`; empty if the directory does not exist
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// File metadata; `Ok(None)` if it does not exist
    fn metadata(&self, path: &Path) -> io::Result<Option<FileMeta>>;

    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_synced(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        Ok(paths)
    }

    fn metadata(&self, path: &Path) -> io::Result<Option<FileMeta>> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(FileMeta {
                len: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }
}
