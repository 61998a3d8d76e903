//! Quarry Core - Foundational types for the Quarry ingestion pipeline
//!
//! This crate provides the types that all other Quarry crates depend on:
//! - `ContentHash` / `ContentHasher` - SHA-256 fingerprints of staged content
//! - Error types and Result alias

mod error;
mod hash;

pub use error::{QuarryError, Result};
pub use hash::{ContentHash, ContentHasher};
