//! MCP tool implementations.
//!
//! This module contains all tools exposed by the websift server.

pub mod web_fetch;
pub mod web_search;

pub use web_fetch::{WebFetchOutput, WebFetchParams};
pub use web_search::{WebSearchOutput, WebSearchParams};
