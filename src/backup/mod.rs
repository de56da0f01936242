//! Backup system for the FAQ store
//!
//! Provides point-in-time snapshots of each environment's document, age-based
//! retention, and validated restore.
//!
//! # Architecture
//!
//! - `manager`: snapshot, list, get, delete and prune
//! - `restore`: validation and restore of an artifact into a live environment
//!
//! # Retention Policy
//!
//! `prune(retention_days)` removes backups older than the window across all
//! environments, but never the newest backup of an environment, so every
//! environment that was ever snapshotted keeps a recovery point.
//!
//! # Example
//!
//! ```rust,ignore
//! use faqstore::FaqStore;
//!
//! let store = FaqStore::open(paths, &settings)?;
//! let env = store.environment("stunting")?;
//!
//! let artifact = store.backups().snapshot(&env)?;
//! store.backups().prune(settings.backup_retention.retention_days)?;
//!
//! // Later, restore from backup
//! let result = store.backups().restore(&artifact.filename, &env)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{artifact_filename, parse_artifact_filename, BackupArtifact, BackupManager};
pub use restore::{RestoreResult, ValidationResult};
