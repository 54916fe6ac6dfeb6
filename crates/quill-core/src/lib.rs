//! # Quill Core
//!
//! The domain layer of the Quill blog platform.
//! This crate contains entities, ports, and the bulk post import pipeline,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod import;
pub mod ports;

pub use error::DomainError;
pub use import::{ImportConfig, ImportError, ImportOutcome, PostImporter};
