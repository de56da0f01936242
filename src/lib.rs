//! faq-store - File-backed FAQ document store
//!
//! This library keeps the FAQ knowledge base of a two-environment chatbot
//! (by default `stunting` and `ppid`) in one JSON document per environment,
//! with atomic writes, per-environment write serialization, and timestamped
//! backups that can be listed, pruned and restored.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (environments, FAQ entries, documents)
//! - `storage`: Document codec, atomic file writes and per-environment locking
//! - `backup`: Snapshots, retention and restore
//! - `services`: FAQ create/read/update/delete on top of storage and backups
//! - `store`: Wires the layers together
//! - `clock`: Injectable time source
//! - `cli` / `display`: Command handlers and terminal formatting for the binary
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use faqstore::config::{FaqPaths, Settings};
//! use faqstore::models::NewFaqEntry;
//! use faqstore::FaqStore;
//!
//! let paths = FaqPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = FaqStore::open(paths, &settings)?;
//!
//! let stunting = store.environment("stunting")?;
//! let entry = store
//!     .faqs(&stunting)?
//!     .create(NewFaqEntry::new("Apa itu stunting?", "Gangguan pertumbuhan anak."))?;
//! ```

pub mod backup;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;

pub use error::{FaqStoreError, FaqStoreResult};
pub use store::FaqStore;
