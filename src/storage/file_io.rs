//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::WriteError;

use super::fs::FileSystem;

const TEMP_SUFFIX: &str = ".tmp";

/// A fresh temp file for replacing `path`
///
/// Lives in the same directory so the final rename stays on one filesystem.
/// The name is unique per call, so concurrent writers (threads or processes)
/// never share a temp file.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}{}", Uuid::new_v4().simple(), TEMP_SUFFIX));
    path.with_file_name(name)
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not modified at all,
/// preventing corruption on crashes, full disks, or concurrent readers.
pub fn write_atomic(fs: &dyn FileSystem, path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let persist_err = |reason: String| WriteError::Persist {
        path: path.display().to_string(),
        reason,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent).map_err(|e| {
            persist_err(format!("failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let temp_path = temp_path_for(path);

    if let Err(e) = fs.write_synced(&temp_path, bytes) {
        let _ = fs.remove(&temp_path);
        return Err(persist_err(format!("failed to write temp file: {}", e)));
    }

    if let Err(e) = fs.rename(&temp_path, path) {
        // Try to clean up temp file if rename fails
        let _ = fs.remove(&temp_path);
        return Err(persist_err(format!("failed to rename temp file: {}", e)));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fault-injecting filesystem for tests

    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::storage::fs::{FileMeta, FileSystem, OsFileSystem};

    /// Delegates to the real filesystem but can be told to fail writes or
    /// removals, or to fail reads of or renames onto one specific path
    #[derive(Debug, Default)]
    pub struct FlakyFileSystem {
        pub fail_writes: AtomicBool,
        pub fail_removes: AtomicBool,
        unreadable: Mutex<Option<PathBuf>>,
        rename_blocked: Mutex<Option<PathBuf>>,
    }

    impl FlakyFileSystem {
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_removes(&self, fail: bool) {
            self.fail_removes.store(fail, Ordering::SeqCst);
        }

        /// Reads of this path fail with an I/O error
        pub fn set_unreadable(&self, path: Option<PathBuf>) {
            *self.unreadable.lock().unwrap() = path;
        }

        /// Renames onto this path fail
        pub fn set_rename_blocked(&self, path: Option<PathBuf>) {
            *self.rename_blocked.lock().unwrap() = path;
        }

        fn matches(slot: &Mutex<Option<PathBuf>>, path: &Path) -> bool {
            slot.lock().unwrap().as_deref() == Some(path)
        }
    }

    fn quota_exceeded() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "disk quota exceeded")
    }

    impl FileSystem for FlakyFileSystem {
        fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
            if Self::matches(&self.unreadable, path) {
                return Err(io::Error::new(io::ErrorKind::Other, "input/output error"));
            }
            OsFileSystem.read(path)
        }

        fn write_synced(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                // Leave a partial file behind, as a full disk would
                let half = &bytes[..bytes.len() / 2];
                OsFileSystem.write_synced(path, half)?;
                return Err(quota_exceeded());
            }
            OsFileSystem.write_synced(path, bytes)
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            if Self::matches(&self.rename_blocked, to) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            OsFileSystem.rename(from, to)
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            if self.fail_removes.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"));
            }
            OsFileSystem.remove(path)
        }

        fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
            OsFileSystem.list(dir)
        }

        fn metadata(&self, path: &Path) -> io::Result<Option<FileMeta>> {
            OsFileSystem.metadata(path)
        }

        fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
            OsFileSystem.create_dir_all(dir)
        }
    }

    /// Temp files left in `dir`
    pub fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        OsFileSystem
            .list(dir)
            .unwrap()
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.ends_with(super::TEMP_SUFFIX))
            })
            .collect()
    }
}
