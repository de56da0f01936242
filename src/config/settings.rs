//! Store settings
//!
//! Manages the configured environment pair, backup retention, lock timeout,
//! and default log level.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::FaqPaths;
use crate::error::FaqStoreError;
use crate::models::EnvironmentSet;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Backups older than this many days are eligible for pruning
    pub retention_days: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

/// Settings for the FAQ store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The two environment names served by this store
    #[serde(default = "default_environments")]
    pub environments: [String; 2],

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Maximum wait for an environment's write lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Log filter used when `FAQSTORE_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_environments() -> [String; 2] {
    ["stunting".to_string(), "ppid".to_string()]
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            environments: default_environments(),
            backup_retention: BackupRetention::default(),
            lock_timeout_ms: default_lock_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Validated environment set
    pub fn environment_set(&self) -> Result<EnvironmentSet, FaqStoreError> {
        EnvironmentSet::new(&self.environments[0], &self.environments[1])
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FaqPaths) -> Result<Self, FaqStoreError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FaqStoreError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FaqStoreError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            // Surface a bad environment pair at load time rather than first use
            settings.environment_set()?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FaqPaths) -> Result<(), FaqStoreError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FaqStoreError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            FaqStoreError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
