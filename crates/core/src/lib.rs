//! Core types and shared functionality for websift.
//!
//! This crate provides:
//! - Search result data model and search parameters
//! - File-backed page and query caches
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod params;

pub use cache::{PageCache, QueryCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{SearchResultEntry, SearchResultSet, Source, Sources};
pub use params::{ProviderKind, SearchParams};
