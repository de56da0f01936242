//! Store coordinator
//!
//! Wires the environment store, backup manager and injected collaborators
//! (filesystem, clock, environment set) together and hands out per-environment
//! repositories.

use std::sync::Arc;

use crate::backup::BackupManager;
use crate::clock::{Clock, SystemClock};
use crate::config::{FaqPaths, Settings};
use crate::error::{FaqStoreError, FaqStoreResult};
use crate::models::{Environment, EnvironmentSet};
use crate::services::FaqRepository;
use crate::storage::{EnvironmentStore, FileSystem, OsFileSystem};

/// Main entry point: the documents of both environments plus their backups
pub struct FaqStore {
    paths: FaqPaths,
    documents: Arc<EnvironmentStore>,
    backups: BackupManager,
}

impl FaqStore {
    /// Open a store on the real filesystem and clock
    pub fn open(paths: FaqPaths, settings: &Settings) -> FaqStoreResult<Self> {
        paths.ensure_directories()?;
        Self::with_parts(paths, settings, Arc::new(OsFileSystem), Arc::new(SystemClock))
    }

    /// Open a store with explicit collaborators
    pub fn with_parts(
        paths: FaqPaths,
        settings: &Settings,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
    ) -> FaqStoreResult<Self> {
        let documents = Arc::new(EnvironmentStore::new(
            &paths,
            settings.environment_set()?,
            fs,
            settings.lock_timeout(),
        ));
        let backups = BackupManager::new(&paths, Arc::clone(&documents), clock)?;

        Ok(Self {
            paths,
            documents,
            backups,
        })
    }

    pub fn paths(&self) -> &FaqPaths {
        &self.paths
    }

    /// The configured environments
    pub fn environments(&self) -> &EnvironmentSet {
        self.documents.environments()
    }

    /// Resolve an environment name
    pub fn environment(&self, name: &str) -> FaqStoreResult<Environment> {
        self.environments().resolve(name)
    }

    pub fn documents(&self) -> &EnvironmentStore {
        &self.documents
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// FAQ repository for one environment
    pub fn faqs(&self, env: &Environment) -> FaqStoreResult<FaqRepository<'_>> {
        if !self.environments().contains(env) {
            return Err(FaqStoreError::UnknownEnvironment(env.to_string()));
        }
        Ok(FaqRepository::new(self, env.clone()))
    }
}
