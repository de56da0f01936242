//! FAQ service
//!
//! The façade the HTTP layer talks to: list, create, update and delete FAQ
//! entries of one environment.
//!
//! Every mutation runs as one sequence under the environment's write lock:
//! read the current document, apply the change in memory, validate, snapshot
//! the pre-mutation file, then atomically write the new document. If the
//! snapshot fails nothing is written; if the write fails the snapshot is
//! discarded again. Success is only returned once the new document is on
//! disk.

use std::collections::BTreeSet;

use crate::error::{FaqStoreError, FaqStoreResult};
use crate::models::{Environment, FaqDocument, FaqEntry, FaqEntryPatch, FaqId, NewFaqEntry};
use crate::store::FaqStore;

/// FAQ operations scoped to one environment
///
/// # Concurrency
///
/// Safe to use from many threads at once. Mutations of the same environment
/// are serialized: a second mutation blocks until the first finishes, for at
/// most the configured lock timeout (`lock_timeout_ms`), and then fails with
/// `FaqStoreError::Busy`. Mutations of different environments never wait on
/// each other, and reads never wait at all.
pub struct FaqRepository<'a> {
    store: &'a FaqStore,
    environment: Environment,
}

impl<'a> FaqRepository<'a> {
    pub(crate) fn new(store: &'a FaqStore, environment: Environment) -> Self {
        Self { store, environment }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// All entries in document order
    pub fn list(&self) -> FaqStoreResult<Vec<FaqEntry>> {
        Ok(self.document()?.entries)
    }

    /// Get an entry by id
    pub fn get(&self, id: &FaqId) -> FaqStoreResult<FaqEntry> {
        self.document()?
            .get(id)
            .cloned()
            .ok_or_else(|| FaqStoreError::faq_not_found(id.as_str()))
    }

    /// Distinct categories in use (case-sensitive, sorted)
    pub fn categories(&self) -> FaqStoreResult<BTreeSet<String>> {
        Ok(self.document()?.categories())
    }

    /// Create an entry, assigning it a fresh id and appending it
    pub fn create(&self, new: NewFaqEntry) -> FaqStoreResult<FaqEntry> {
        let candidate = new.into_entry(FaqId::new());
        candidate
            .validate()
            .map_err(|e| FaqStoreError::Validation(e.to_string()))?;

        let entry = self.mutate(|doc| {
            let mut entry = candidate;
            while doc.position(&entry.id).is_some() {
                entry.id = FaqId::new();
            }
            doc.entries.push(entry.clone());
            Ok(entry)
        })?;

        tracing::info!(
            environment = %self.environment,
            id = %entry.id,
            "FAQ created"
        );
        Ok(entry)
    }

    /// Merge the provided fields into an existing entry
    pub fn update(&self, id: &FaqId, patch: FaqEntryPatch) -> FaqStoreResult<FaqEntry> {
        let entry = self.mutate(|doc| {
            let index = doc
                .position(id)
                .ok_or_else(|| FaqStoreError::faq_not_found(id.as_str()))?;

            let mut updated = doc.entries[index].clone();
            updated.apply(patch);
            updated
                .validate()
                .map_err(|e| FaqStoreError::Validation(e.to_string()))?;

            doc.entries[index] = updated.clone();
            Ok(updated)
        })?;

        tracing::info!(environment = %self.environment, id = %id, "FAQ updated");
        Ok(entry)
    }

    /// Remove an entry, keeping the order of the rest
    pub fn delete(&self, id: &FaqId) -> FaqStoreResult<()> {
        self.mutate(|doc| {
            let index = doc
                .position(id)
                .ok_or_else(|| FaqStoreError::faq_not_found(id.as_str()))?;
            doc.entries.remove(index);
            Ok(())
        })?;

        tracing::info!(environment = %self.environment, id = %id, "FAQ deleted");
        Ok(())
    }

    fn document(&self) -> FaqStoreResult<FaqDocument> {
        self.store.documents().read(&self.environment)
    }

    /// Run one snapshot-then-write mutation under the environment's lock
    ///
    /// `apply` may fail (e.g. not found); nothing is snapshotted or written then.
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut FaqDocument) -> FaqStoreResult<T>,
    ) -> FaqStoreResult<T> {
        let documents = self.store.documents();
        let guard = documents.lock(&self.environment)?;

        let mut document = documents.read(&self.environment)?;
        let result = apply(&mut document)?;
        document
            .validate()
            .map_err(|e| FaqStoreError::Validation(e.to_string()))?;

        let backups = self.store.backups();
        let snapshot = backups.snapshot_locked(&guard)?;
        if let Err(e) = documents.write_locked(&guard, &document) {
            backups.discard(&snapshot);
            return Err(e);
        }

        Ok(result)
    }
}
