//! Service layer
//!
//! Business logic on top of the storage and backup layers.

pub mod faq;

pub use faq::FaqRepository;
