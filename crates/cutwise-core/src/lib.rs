//! # Cutwise Core
//!
//! Shared logic for Cutwise: data models, the chunk-store abstraction,
//! hybrid retrieval, and multilingual recipe prompt assembly.
//!
//! This crate contains no tokio, HTTP, or filesystem I/O — concrete
//! embedding/generation providers and the corpus loader live in the
//! `cutwise` application crate. Everything here is deterministic and
//! testable without network access.

pub mod embedding;
pub mod error;
pub mod models;
pub mod prompt;
pub mod query;
pub mod sanitize;
pub mod search;
pub mod store;
pub mod terms;
