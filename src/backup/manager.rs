//! Backup manager for the FAQ store
//!
//! Snapshots an environment's canonical file into an immutable artifact in
//! the backup directory, lists artifacts, and prunes them by age.
//!
//! Artifact names look like
//! `faq_backup_20250131-084502-123_0000000042_stunting.json`: the timestamp
//! has millisecond resolution, and the sequence number breaks ties within a
//! clock tick, so names never collide and sort lexically in creation order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::clock::Clock;
use crate::config::FaqPaths;
use crate::error::{FaqStoreError, FaqStoreResult};
use crate::models::{Environment, FaqDocument};
use crate::storage::{codec, write_atomic, EnvironmentStore, FileSystem, WriteGuard};

const PREFIX: &str = "faq_backup_";
const SUFFIX: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S-%3f";

/// Metadata about a backup artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupArtifact {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// Environment the snapshot was taken from
    pub environment: Environment,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Tie-breaker for snapshots within the same millisecond
    pub sequence: u64,
    /// Size in bytes
    pub size_bytes: u64,
    /// SHA-256 of the artifact contents, hex encoded
    pub checksum: String,
}

/// Manages backup creation and retention
pub struct BackupManager {
    /// Path to backup directory
    backup_dir: PathBuf,
    store: Arc<EnvironmentStore>,
    clock: Arc<dyn Clock>,
    next_sequence: AtomicU64,
}

impl BackupManager {
    /// Create a new BackupManager
    ///
    /// The sequence counter starts after the highest sequence already on
    /// disk, so names stay unique across restarts.
    pub fn new(
        paths: &FaqPaths,
        store: Arc<EnvironmentStore>,
        clock: Arc<dyn Clock>,
    ) -> FaqStoreResult<Self> {
        let manager = Self {
            backup_dir: paths.backup_dir(),
            store,
            clock,
            next_sequence: AtomicU64::new(0),
        };

        let highest = manager
            .scan()?
            .iter()
            .map(|a| a.sequence)
            .max()
            .map_or(0, |s| s + 1);
        manager.next_sequence.store(highest, Ordering::SeqCst);

        Ok(manager)
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    pub(crate) fn store(&self) -> &EnvironmentStore {
        &self.store
    }

    fn fs(&self) -> &dyn FileSystem {
        self.store.file_system().as_ref()
    }

    /// Snapshot an environment's current canonical content
    ///
    /// An environment with no file yet is snapshotted as an empty document.
    /// Takes the environment's write lock while the artifact is written.
    pub fn snapshot(&self, env: &Environment) -> FaqStoreResult<BackupArtifact> {
        let guard = self.store.lock(env)?;
        self.snapshot_locked(&guard)
    }

    /// Snapshot while already holding the environment's write lock
    pub(crate) fn snapshot_locked(&self, guard: &WriteGuard<'_>) -> FaqStoreResult<BackupArtifact> {
        let env = guard.environment();
        let bytes = match self.store.read_raw(env)? {
            Some(bytes) => bytes,
            None => codec::encode(&FaqDocument::empty(env.clone())),
        };

        let now = self.clock.now();
        let (filename, path, sequence) = loop {
            let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
            let filename = artifact_filename(env, now, sequence);
            let path = self.backup_dir.join(&filename);
            // Another store may share the directory; the write lock makes
            // this check and the write below one step per environment
            if self.fs().metadata(&path)?.is_none() {
                break (filename, path, sequence);
            }
        };

        write_atomic(self.fs(), &path, &bytes)?;

        let artifact = BackupArtifact {
            filename,
            path,
            environment: env.clone(),
            created_at: parse_timestamp(&now.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or(now),
            sequence,
            size_bytes: bytes.len() as u64,
            checksum: checksum(&bytes),
        };

        tracing::info!(
            environment = %env,
            filename = %artifact.filename,
            size = artifact.size_bytes,
            "backup created"
        );

        Ok(artifact)
    }

    /// List backups, newest first, optionally for one environment
    pub fn list(&self, env: Option<&Environment>) -> FaqStoreResult<Vec<BackupArtifact>> {
        let mut artifacts: Vec<_> = self
            .scan()?
            .into_iter()
            .filter(|a| env.map_or(true, |e| &a.environment == e))
            .collect();

        artifacts.sort_by(|a, b| {
            (b.created_at, b.sequence).cmp(&(a.created_at, a.sequence))
        });

        Ok(artifacts)
    }

    /// Get a specific backup by filename
    pub fn get(&self, filename: &str) -> FaqStoreResult<BackupArtifact> {
        if filename.contains(|c| c == '/' || c == '\\') {
            return Err(FaqStoreError::backup_not_found(filename));
        }
        let path = self.backup_dir.join(filename);
        self.load_artifact(&path)?
            .ok_or_else(|| FaqStoreError::backup_not_found(filename))
    }

    /// Get the most recent backup of an environment
    pub fn latest(&self, env: &Environment) -> FaqStoreResult<Option<BackupArtifact>> {
        Ok(self.list(Some(env))?.into_iter().next())
    }

    /// Read an artifact's raw contents
    pub fn read(&self, artifact: &BackupArtifact) -> FaqStoreResult<Vec<u8>> {
        self.fs()
            .read(&artifact.path)?
            .ok_or_else(|| FaqStoreError::backup_not_found(&artifact.filename))
    }

    /// Remove an artifact that was snapshotted for a write that then failed
    ///
    /// Best effort: a removal failure is logged and otherwise ignored.
    pub(crate) fn discard(&self, artifact: &BackupArtifact) {
        match self.fs().remove(&artifact.path) {
            Ok(()) => tracing::info!(
                filename = %artifact.filename,
                "backup discarded after failed write"
            ),
            Err(e) => tracing::warn!(
                filename = %artifact.filename,
                error = %e,
                "failed to discard backup of failed write"
            ),
        }
    }

    /// Delete one backup
    pub fn delete(&self, filename: &str) -> FaqStoreResult<BackupArtifact> {
        let artifact = self.get(filename)?;
        self.fs().remove(&artifact.path)?;
        tracing::info!(filename = %artifact.filename, "backup deleted");
        Ok(artifact)
    }

    /// Backups that `prune(retention_days)` would delete, newest first
    ///
    /// The newest backup of each environment is never a candidate, however old.
    pub fn prune_candidates(&self, retention_days: u32) -> FaqStoreResult<Vec<BackupArtifact>> {
        let cutoff = self.clock.now() - Duration::days(i64::from(retention_days));
        let mut newest_seen = HashSet::new();

        Ok(self
            .list(None)?
            .into_iter()
            // Newest-first order: the first artifact per environment is its newest
            .filter(|a| !newest_seen.insert(a.environment.clone()))
            .filter(|a| a.created_at < cutoff)
            .collect())
    }

    /// Delete backups older than `retention_days`, across all environments
    ///
    /// The newest backup of each environment is always kept. A backup that
    /// cannot be deleted is logged and skipped. Returns the number of backups
    /// actually removed.
    pub fn prune(&self, retention_days: u32) -> FaqStoreResult<usize> {
        let mut removed = 0;

        for artifact in self.prune_candidates(retention_days)? {
            match self.fs().remove(&artifact.path) {
                Ok(()) => {
                    removed += 1;
                    tracing::info!(
                        filename = %artifact.filename,
                        created_at = %artifact.created_at,
                        "old backup deleted"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        filename = %artifact.filename,
                        error = %e,
                        "failed to delete old backup, skipping"
                    );
                }
            }
        }

        tracing::info!(removed, retention_days, "backup pruning completed");
        Ok(removed)
    }

    /// Every readable artifact in the backup directory, unordered
    ///
    /// An artifact that cannot be read is logged and left out.
    fn scan(&self) -> FaqStoreResult<Vec<BackupArtifact>> {
        let mut artifacts = Vec::new();
        for path in self.fs().list(&self.backup_dir)? {
            match self.load_artifact(&path) {
                Ok(Some(artifact)) => artifacts.push(artifact),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable backup"
                    );
                }
            }
        }
        Ok(artifacts)
    }

    /// Build artifact metadata from a path; `None` if it is not a backup
    fn load_artifact(&self, path: &Path) -> FaqStoreResult<Option<BackupArtifact>> {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        let Some((environment, created_at, sequence)) = parse_artifact_filename(filename) else {
            return Ok(None);
        };
        // Removed between listing and reading
        let Some(bytes) = self.fs().read(path)? else {
            return Ok(None);
        };

        Ok(Some(BackupArtifact {
            filename: filename.to_string(),
            path: path.to_path_buf(),
            environment,
            created_at,
            sequence,
            size_bytes: bytes.len() as u64,
            checksum: checksum(&bytes),
        }))
    }
}

fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Build the filename of a new artifact
pub fn artifact_filename(env: &Environment, created_at: DateTime<Utc>, sequence: u64) -> String {
    format!(
        "{}{}_{:010}_{}{}",
        PREFIX,
        created_at.format(TIMESTAMP_FORMAT),
        sequence,
        env,
        SUFFIX
    )
}

/// Recover environment, timestamp and sequence from an artifact filename
pub fn parse_artifact_filename(filename: &str) -> Option<(Environment, DateTime<Utc>, u64)> {
    let stem = filename.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    let mut parts = stem.splitn(3, '_');

    let created_at = parse_timestamp(parts.next()?)?;
    let sequence_str = parts.next()?;
    if sequence_str.len() != 10 || !sequence_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sequence = sequence_str.parse().ok()?;
    let environment = Environment::parse(parts.next()?).ok()?;

    Some((environment, created_at, sequence))
}

/// Parse a backup timestamp: YYYYMMDD-HHMMSS-mmm
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.len() != 19 {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}
