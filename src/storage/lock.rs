//! Per-environment write gate
//!
//! A gate admits one writer at a time, across threads and across processes.
//! Threads of one process queue on an in-memory flag; separate processes (or
//! separate store handles on one data directory) are excluded by an advisory
//! lock on a per-environment lock file. Waiting is bounded: if access is not
//! obtained within the timeout the caller gets `FaqStoreError::Busy` instead
//! of blocking indefinitely.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{FaqStoreError, FaqStoreResult};
use crate::models::Environment;

const FIRST_RETRY: Duration = Duration::from_millis(2);
const MAX_RETRY: Duration = Duration::from_millis(50);

/// Single-writer gate for one environment
#[derive(Debug)]
pub struct WriteGate {
    environment: Environment,
    lock_path: PathBuf,
    held: Mutex<bool>,
    released: Condvar,
}

impl WriteGate {
    /// Create a gate whose cross-process lock lives at `lock_path`
    pub fn new(environment: Environment, lock_path: PathBuf) -> Self {
        Self {
            environment,
            lock_path,
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    /// Wait up to `timeout` for exclusive write access
    pub fn acquire(&self, timeout: Duration) -> FaqStoreResult<WriteGuard<'_>> {
        let deadline = Instant::now() + timeout;
        let mut held = self.state();

        while *held {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.busy(timeout));
            }
            held = self
                .released
                .wait_timeout(held, remaining)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
        *held = true;
        drop(held);

        match self.lock_file(deadline, timeout) {
            Ok(file) => Ok(WriteGuard { gate: self, file }),
            Err(e) => {
                self.release();
                Err(e)
            }
        }
    }

    #[cfg(test)]
    fn is_held(&self) -> bool {
        *self.state()
    }

    /// Take the advisory file lock, retrying with backoff until `deadline`
    fn lock_file(&self, deadline: Instant, timeout: Duration) -> FaqStoreResult<File> {
        let io_err = |e: std::io::Error| {
            FaqStoreError::Io(format!(
                "Failed to lock {}: {}",
                self.lock_path.display(),
                e
            ))
        };

        if let Some(parent) = self.lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(io_err)?;

        let contended = fs2::lock_contended_error().raw_os_error();
        let mut backoff = FIRST_RETRY;
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(file),
                Err(e) if e.raw_os_error() == contended => {}
                Err(e) => return Err(io_err(e)),
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.busy(timeout));
            }
            thread::sleep(backoff.min(remaining));
            backoff = (backoff * 2).min(MAX_RETRY);
        }
    }

    fn busy(&self, timeout: Duration) -> FaqStoreError {
        tracing::debug!(environment = %self.environment, "write gate wait timed out");
        FaqStoreError::Busy {
            environment: self.environment.to_string(),
            waited_ms: timeout.as_millis() as u64,
        }
    }

    fn release(&self) {
        *self.state() = false;
        self.released.notify_one();
    }

    // The flag stays consistent even if a holder panicked, so poisoning is ignored.
    fn state(&self) -> MutexGuard<'_, bool> {
        self.held.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Exclusive write access to one environment; released on drop
#[derive(Debug)]
pub struct WriteGuard<'a> {
    gate: &'a WriteGate,
    file: File,
}

impl WriteGuard<'_> {
    pub fn environment(&self) -> &Environment {
        &self.gate.environment
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(
                path = %self.gate.lock_path.display(),
                error = %e,
                "failed to unlock write gate file"
            );
        }
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn gate(dir: &TempDir) -> WriteGate {
        WriteGate::new(
            Environment::parse("stunting").unwrap(),
            dir.path().join("faq_stunting.json.lock"),
        )
    }

    #[test]
    fn test_acquire_and_release() {
        let temp_dir = TempDir::new().unwrap();
        let gate = gate(&temp_dir);
        {
            let guard = gate.acquire(Duration::from_millis(10)).unwrap();
            assert!(gate.is_held());
            assert_eq!(guard.environment().as_str(), "stunting");
            assert!(temp_dir.path().join("faq_stunting.json.lock").exists());
        }
        assert!(!gate.is_held());
    }

    #[test]
    fn test_second_acquire_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let gate = gate(&temp_dir);
        let _guard = gate.acquire(Duration::from_millis(10)).unwrap();

        let err = gate.acquire(Duration::from_millis(20)).unwrap_err();
        assert!(err.is_busy());
    }

    #[test]
    fn test_waiter_proceeds_after_release() {
        let temp_dir = TempDir::new().unwrap();
        let gate = Arc::new(gate(&temp_dir));
        let guard = gate.acquire(Duration::from_millis(10)).unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.acquire(Duration::from_secs(5)).map(|_| ()))
        };

        thread::sleep(Duration::from_millis(50));
        drop(guard);

        assert!(waiter.join().unwrap().is_ok());
        assert!(!gate.is_held());
    }

    #[test]
    fn test_separate_gates_on_one_lock_file_exclude_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let first = gate(&temp_dir);
        let second = gate(&temp_dir);

        let guard = first.acquire(Duration::from_millis(10)).unwrap();
        let err = second.acquire(Duration::from_millis(30)).unwrap_err();
        assert!(err.is_busy());
        // A timed-out file lock leaves the in-memory flag free
        assert!(!second.is_held());

        drop(guard);
        assert!(second.acquire(Duration::from_millis(100)).is_ok());
    }

    #[test]
    fn test_file_lock_waiter_proceeds_after_release() {
        let temp_dir = TempDir::new().unwrap();
        let first = gate(&temp_dir);
        let second = Arc::new(gate(&temp_dir));
        let guard = first.acquire(Duration::from_millis(10)).unwrap();

        let waiter = {
            let second = Arc::clone(&second);
            thread::spawn(move || second.acquire(Duration::from_secs(5)).map(|_| ()))
        };

        thread::sleep(Duration::from_millis(50));
        drop(guard);

        assert!(waiter.join().unwrap().is_ok());
    }
}
