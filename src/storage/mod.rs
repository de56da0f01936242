//! Storage layer for the FAQ store
//!
//! Provides the document codec, atomic per-environment file storage, and the
//! filesystem abstraction both are built on.

pub mod codec;
pub mod environment;
pub mod file_io;
pub mod fs;
pub mod lock;

pub use codec::{decode, encode};
pub use environment::{DocumentStats, EnvironmentStore};
pub use file_io::write_atomic;
pub use fs::{FileMeta, FileSystem, OsFileSystem};
pub use lock::{WriteGate, WriteGuard};
