//! Backup restoration
//!
//! A restore validates the artifact with the document codec before touching
//! the live file, refuses artifacts from another environment, and snapshots
//! the live state first so the restore itself can be undone.

use serde::Serialize;

use crate::error::{DecodeError, FaqStoreResult, RestoreError};
use crate::models::Environment;
use crate::storage::codec;

use super::manager::{BackupArtifact, BackupManager};

/// Result of a restore operation
#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    /// The artifact that is now live
    pub restored: BackupArtifact,
    /// Snapshot of the state that was replaced
    pub pre_restore: BackupArtifact,
    /// Entries in the restored document
    pub entry_count: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} ({} FAQ entries) into '{}'; previous state saved as {}",
            self.restored.filename,
            self.entry_count,
            self.restored.environment,
            self.pre_restore.filename
        )
    }
}

/// Result of validating a backup
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub artifact: BackupArtifact,
    /// Why the artifact would be rejected, if it would
    pub problem: Option<DecodeError>,
    pub entry_count: usize,
    pub question_count: usize,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.problem.is_none()
    }

    /// Get a summary of the backup's state
    pub fn summary(&self) -> String {
        match &self.problem {
            None => format!(
                "Valid backup of '{}': {} entries, {} questions",
                self.artifact.environment, self.entry_count, self.question_count
            ),
            Some(problem) => format!("Invalid backup: {}", problem),
        }
    }
}

impl BackupManager {
    /// Validate a backup without restoring it
    pub fn validate(&self, filename: &str) -> FaqStoreResult<ValidationResult> {
        let artifact = self.get(filename)?;
        let bytes = self.read(&artifact)?;

        Ok(match codec::decode(&bytes) {
            Ok(document) => ValidationResult {
                artifact,
                problem: None,
                entry_count: document.len(),
                question_count: document.question_count(),
            },
            Err(problem) => ValidationResult {
                artifact,
                problem: Some(problem),
                entry_count: 0,
                question_count: 0,
            },
        })
    }

    /// Restore a backup into the live file of `target`
    ///
    /// Rejected with `RestoreError::EnvironmentMismatch` if the artifact was
    /// taken from another environment and with `RestoreError::Invalid` if it
    /// does not decode; in both cases the live file is untouched.
    pub fn restore(&self, filename: &str, target: &Environment) -> FaqStoreResult<RestoreResult> {
        let artifact = self.get(filename)?;

        if &artifact.environment != target {
            return Err(RestoreError::EnvironmentMismatch {
                artifact: artifact.environment.to_string(),
                target: target.to_string(),
            }
            .into());
        }

        let bytes = self.read(&artifact)?;
        let document = codec::decode(&bytes).map_err(|source| RestoreError::Invalid {
            filename: artifact.filename.clone(),
            source,
        })?;

        if &document.environment != target {
            return Err(RestoreError::EnvironmentMismatch {
                artifact: document.environment.to_string(),
                target: target.to_string(),
            }
            .into());
        }

        let guard = self.store().lock(target)?;
        let pre_restore = self.snapshot_locked(&guard)?;
        if let Err(e) = self.store().write_raw_locked(&guard, &bytes) {
            self.discard(&pre_restore);
            return Err(e);
        }
        drop(guard);

        tracing::info!(
            environment = %target,
            filename = %artifact.filename,
            pre_restore = %pre_restore.filename,
            "restored from backup"
        );

        Ok(RestoreResult {
            restored: artifact,
            pre_restore,
            entry_count: document.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::FaqPaths;
    use crate::error::FaqStoreError;
    use crate::models::{EnvironmentSet, FaqDocument, FaqId, NewFaqEntry};
    use crate::storage::file_io::testing::FlakyFileSystem;
    use crate::storage::{EnvironmentStore, OsFileSystem};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    fn create_test_env() -> (BackupManager, Arc<FixedClock>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaqPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = Arc::new(EnvironmentStore::new(
            &paths,
            EnvironmentSet::default(),
            Arc::new(OsFileSystem),
            StdDuration::from_millis(200),
        ));
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let manager = BackupManager::new(&paths, store, clock.clone()).unwrap();
        (manager, clock, temp_dir)
    }

    fn env(name: &str) -> Environment {
        Environment::parse(name).unwrap()
    }

    fn write_entries(manager: &BackupManager, env: &Environment, answers: &[&str]) {
        let mut doc = FaqDocument::empty(env.clone());
        for (i, answer) in answers.iter().enumerate() {
            doc.entries.push(
                NewFaqEntry::new(format!("Q{}", i), *answer)
                    .into_entry(FaqId::from_string(i.to_string())),
            );
        }
        manager.store().write(env, &doc).unwrap();
    }

    #[test]
    fn test_restore_from_backup() {
        let (manager, clock, _temp) = create_test_env();
        let stunting = env("stunting");

        write_entries(&manager, &stunting, &["original"]);
        let backup = manager.snapshot(&stunting).unwrap();
        let original_bytes = manager.read(&backup).unwrap();

        clock.advance(Duration::seconds(1));
        write_entries(&manager, &stunting, &["changed", "added"]);

        let result = manager.restore(&backup.filename, &stunting).unwrap();
        assert_eq!(result.entry_count, 1);
        assert_eq!(
            manager.store().read_raw(&stunting).unwrap().unwrap(),
            original_bytes
        );

        // The replaced state was preserved
        let pre = manager.read(&result.pre_restore).unwrap();
        assert_eq!(codec::decode(&pre).unwrap().len(), 2);
        assert!(result.summary().contains(&backup.filename));
    }

    #[test]
    fn test_restore_into_other_environment_rejected() {
        let (manager, _clock, _temp) = create_test_env();
        let stunting = env("stunting");
        let ppid = env("ppid");

        write_entries(&manager, &stunting, &["stunting answer"]);
        write_entries(&manager, &ppid, &["ppid answer"]);
        let backup = manager.snapshot(&stunting).unwrap();
        let before = manager.store().read_raw(&ppid).unwrap().unwrap();
        let backups_before = manager.list(None).unwrap().len();

        let err = manager.restore(&backup.filename, &ppid).unwrap_err();
        assert!(matches!(
            err,
            FaqStoreError::Restore(RestoreError::EnvironmentMismatch { .. })
        ));

        assert_eq!(manager.store().read_raw(&ppid).unwrap().unwrap(), before);
        assert_eq!(manager.list(None).unwrap().len(), backups_before);
    }

    #[test]
    fn test_restore_invalid_artifact_rejected() {
        let (manager, _clock, _temp) = create_test_env();
        let ppid = env("ppid");

        write_entries(&manager, &ppid, &["live"]);
        let backup = manager.snapshot(&ppid).unwrap();
        std::fs::write(&backup.path, r#"{"environment":"ppid","faqs":[{"id":1}]}"#).unwrap();
        let before = manager.store().read_raw(&ppid).unwrap().unwrap();

        let err = manager.restore(&backup.filename, &ppid).unwrap_err();
        assert!(matches!(
            err,
            FaqStoreError::Restore(RestoreError::Invalid { .. })
        ));
        assert!(err.is_corruption());
        assert_eq!(manager.store().read_raw(&ppid).unwrap().unwrap(), before);
    }

    #[test]
    fn test_restore_renamed_artifact_checks_declared_environment() {
        let (manager, _clock, _temp) = create_test_env();
        let stunting = env("stunting");
        let ppid = env("ppid");

        write_entries(&manager, &stunting, &["stunting answer"]);
        let backup = manager.snapshot(&stunting).unwrap();
        let disguised = backup.filename.replace("_stunting.json", "_ppid.json");
        std::fs::rename(&backup.path, manager.backup_dir().join(&disguised)).unwrap();

        let err = manager.restore(&disguised, &ppid).unwrap_err();
        assert!(matches!(
            err,
            FaqStoreError::Restore(RestoreError::EnvironmentMismatch { .. })
        ));
        assert!(manager.store().read_raw(&ppid).unwrap().is_none());
    }

    #[test]
    fn test_failed_restore_discards_pre_restore_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaqPaths::with_base_dir(temp_dir.path().to_path_buf());
        let flaky = Arc::new(FlakyFileSystem::default());
        let store = Arc::new(EnvironmentStore::new(
            &paths,
            EnvironmentSet::default(),
            flaky.clone(),
            StdDuration::from_millis(200),
        ));
        let manager =
            BackupManager::new(&paths, store, Arc::new(FixedClock::new(Utc::now()))).unwrap();
        let stunting = env("stunting");

        write_entries(&manager, &stunting, &["old"]);
        let backup = manager.snapshot(&stunting).unwrap();
        write_entries(&manager, &stunting, &["new"]);
        let before = manager.store().read_raw(&stunting).unwrap();

        flaky.set_rename_blocked(Some(manager.store().document_path(&stunting).unwrap()));
        let err = manager.restore(&backup.filename, &stunting).unwrap_err();
        assert!(matches!(err, FaqStoreError::Write(_)));

        assert_eq!(manager.list(None).unwrap(), vec![backup]);
        assert_eq!(manager.store().read_raw(&stunting).unwrap(), before);
    }

    #[test]
    fn test_restore_missing_backup() {
        let (manager, _clock, _temp) = create_test_env();
        let err = manager
            .restore("faq_backup_20250101-000000-000_0000000001_ppid.json", &env("ppid"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validate_backup() {
        let (manager, _clock, _temp) = create_test_env();
        let ppid = env("ppid");
        write_entries(&manager, &ppid, &["a", "b"]);
        let backup = manager.snapshot(&ppid).unwrap();

        let result = manager.validate(&backup.filename).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.entry_count, 2);
        assert!(result.summary().contains("2 entries"));

        std::fs::write(&backup.path, "garbage").unwrap();
        let result = manager.validate(&backup.filename).unwrap();
        assert!(!result.is_valid());
        assert!(matches!(result.problem, Some(DecodeError::Malformed(_))));
    }
}
