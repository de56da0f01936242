//! Configuration module for the FAQ store
//!
//! - Path resolution for documents, backups and settings
//! - Settings persistence (environments, retention, lock timeout)

pub mod paths;
pub mod settings;

pub use paths::FaqPaths;
pub use settings::{BackupRetention, Settings};
