//! Path management for the FAQ store
//!
//! ## Path Resolution Order
//!
//! 1. `FAQSTORE_DATA_DIR` environment variable (if set)
//! 2. The platform data directory for `faq-store`
//!    (e.g. `~/.local/share/faq-store` on Linux)
//!
//! ## Layout
//!
//! ```text
//! <base>/config.json
//! <base>/data/faq_<environment>.json
//! <base>/backups/faq_backup_<timestamp>_<seq>_<environment>.json
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FaqStoreError;
use crate::models::Environment;

/// Manages all paths used by the FAQ store
#[derive(Debug, Clone)]
pub struct FaqPaths {
    /// Base directory for all store data
    base_dir: PathBuf,
}

impl FaqPaths {
    /// Create a new FaqPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FaqStoreError> {
        let base_dir = if let Ok(custom) = std::env::var("FAQSTORE_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "faq-store")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    FaqStoreError::Config("Could not determine home directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create FaqPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the canonical documents
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Canonical document file for an environment
    pub fn document_file(&self, env: &Environment) -> PathBuf {
        self.data_dir().join(format!("faq_{}.json", env))
    }

    /// Advisory lock file guarding writes to an environment
    pub fn lock_file(&self, env: &Environment) -> PathBuf {
        self.data_dir().join(format!("faq_{}.json.lock", env))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), FaqStoreError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FaqStoreError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FaqStoreError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| FaqStoreError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaqPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_document_file() {
        let paths = FaqPaths::with_base_dir(PathBuf::from("/srv/faq"));
        let env = Environment::parse("ppid").unwrap();
        assert_eq!(
            paths.document_file(&env),
            PathBuf::from("/srv/faq/data/faq_ppid.json")
        );
        assert_eq!(
            paths.lock_file(&env),
            PathBuf::from("/srv/faq/data/faq_ppid.json.lock")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaqPaths::with_base_dir(temp_dir.path().join("store"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.backup_dir().exists());
    }
}
