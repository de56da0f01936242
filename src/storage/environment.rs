//! Environment store
//!
//! Owns the canonical document file of each environment. Reads never take a
//! lock: writes go through temp-file-and-rename, so a reader always sees
//! either the old or the new file. Writers to the same environment are
//! serialized by that environment's `WriteGate`; the two environments have
//! independent gates and never block each other.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::FaqPaths;
use crate::error::{DecodeError, FaqStoreError, FaqStoreResult};
use crate::models::{Environment, EnvironmentSet, FaqDocument};

use super::codec;
use super::file_io::write_atomic;
use super::fs::FileSystem;
use super::lock::{WriteGate, WriteGuard};

struct EnvironmentSlot {
    path: PathBuf,
    gate: WriteGate,
}

/// Summary of an environment's canonical file
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub environment: Environment,
    pub exists: bool,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    pub entry_count: usize,
    pub question_count: usize,
}

/// Atomic per-environment document storage
pub struct EnvironmentStore {
    fs: Arc<dyn FileSystem>,
    environments: EnvironmentSet,
    slots: Vec<EnvironmentSlot>,
    lock_timeout: Duration,
}

impl EnvironmentStore {
    /// Create a store with one slot per configured environment
    pub fn new(
        paths: &FaqPaths,
        environments: EnvironmentSet,
        fs: Arc<dyn FileSystem>,
        lock_timeout: Duration,
    ) -> Self {
        let slots = environments
            .iter()
            .map(|env| EnvironmentSlot {
                path: paths.document_file(env),
                gate: WriteGate::new(env.clone(), paths.lock_file(env)),
            })
            .collect();

        Self {
            fs,
            environments,
            slots,
            lock_timeout,
        }
    }

    pub fn environments(&self) -> &EnvironmentSet {
        &self.environments
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    fn slot(&self, env: &Environment) -> FaqStoreResult<&EnvironmentSlot> {
        self.environments
            .index_of(env)
            .and_then(|i| self.slots.get(i))
            .ok_or_else(|| FaqStoreError::UnknownEnvironment(env.to_string()))
    }

    /// Path of an environment's canonical file
    pub fn document_path(&self, env: &Environment) -> FaqStoreResult<PathBuf> {
        Ok(self.slot(env)?.path.clone())
    }

    /// Acquire exclusive write access to an environment
    ///
    /// Waits at most the configured lock timeout, then fails with `Busy`.
    pub fn lock(&self, env: &Environment) -> FaqStoreResult<WriteGuard<'_>> {
        self.slot(env)?.gate.acquire(self.lock_timeout)
    }

    /// Raw canonical bytes, or `None` if the environment has no file yet
    pub fn read_raw(&self, env: &Environment) -> FaqStoreResult<Option<Vec<u8>>> {
        let slot = self.slot(env)?;
        self.fs.read(&slot.path).map_err(|e| {
            FaqStoreError::Io(format!("Failed to read {}: {}", slot.path.display(), e))
        })
    }

    /// Read an environment's document
    ///
    /// A missing file yields an empty document. A file that fails to decode
    /// is reported as-is; it is never replaced by an empty document.
    pub fn read(&self, env: &Environment) -> FaqStoreResult<FaqDocument> {
        match self.read_raw(env)? {
            None => Ok(FaqDocument::empty(env.clone())),
            Some(bytes) => {
                let document = codec::decode(&bytes)?;
                if &document.environment != env {
                    return Err(DecodeError::SchemaViolation(format!(
                        "file for '{}' declares environment '{}'",
                        env, document.environment
                    ))
                    .into());
                }
                Ok(document)
            }
        }
    }

    /// Persist a document, taking the environment's write lock for the duration
    pub fn write(&self, env: &Environment, document: &FaqDocument) -> FaqStoreResult<()> {
        let guard = self.lock(env)?;
        self.write_locked(&guard, document)
    }

    /// Persist a document while already holding the environment's write lock
    pub fn write_locked(&self, guard: &WriteGuard<'_>, document: &FaqDocument) -> FaqStoreResult<()> {
        let env = guard.environment();
        if &document.environment != env {
            return Err(FaqStoreError::Validation(format!(
                "document for '{}' cannot be written to '{}'",
                document.environment, env
            )));
        }
        document
            .validate()
            .map_err(|e| FaqStoreError::Validation(e.to_string()))?;

        self.write_raw_locked(guard, &codec::encode(document))?;

        tracing::info!(
            environment = %env,
            entries = document.len(),
            "FAQ document written"
        );
        Ok(())
    }

    /// Replace the canonical file with already-validated bytes
    pub(crate) fn write_raw_locked(&self, guard: &WriteGuard<'_>, bytes: &[u8]) -> FaqStoreResult<()> {
        let slot = self.slot(guard.environment())?;
        write_atomic(self.fs.as_ref(), &slot.path, bytes)?;
        Ok(())
    }

    /// File and content statistics for an environment
    pub fn stats(&self, env: &Environment) -> FaqStoreResult<DocumentStats> {
        let slot = self.slot(env)?;
        let meta = self
            .fs
            .metadata(&slot.path)
            .map_err(|e| FaqStoreError::Io(format!("Failed to stat {}: {}", slot.path.display(), e)))?;
        let document = self.read(env)?;

        Ok(DocumentStats {
            environment: env.clone(),
            exists: meta.is_some(),
            size_bytes: meta.map(|m| m.len).unwrap_or(0),
            modified: meta.and_then(|m| m.modified),
            entry_count: document.len(),
            question_count: document.question_count(),
        })
    }
}
