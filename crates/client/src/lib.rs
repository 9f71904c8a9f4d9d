//! Client code for websift.
//!
//! This crate provides the search pipeline: providers, page fetching and
//! extraction, result budgeting, and prompt augmentation with cached results.

pub mod budget;
pub mod extract;
pub mod fetch;
pub mod prompt;
pub mod provider;
pub mod search;

pub use extract::{ExtractOptions, Extractor, ScrapeExtractor, extract_text};
pub use fetch::{FetchConfig, PageFetcher};
pub use prompt::{DEFAULT_INSTRUCTIONS, PromptOptions};
pub use provider::{
    BraveProvider, DuckDuckGoProvider, ProviderRegistry, ProviderResponse, RawHit, SearXngProvider, SearchProvider,
};
pub use search::WebSearch;
