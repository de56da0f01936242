//! Core data models for the FAQ store
//!
//! This module contains the data structures persisted per environment:
//! FAQ entries, the documents that hold them, and environment names.

pub mod environment;
pub mod faq;
pub mod ids;

pub use environment::{Environment, EnvironmentSet};
pub use faq::{FaqDocument, FaqEntry, FaqEntryPatch, FaqValidationError, NewFaqEntry};
pub use ids::FaqId;
