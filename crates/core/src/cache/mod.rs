//! File-backed caches for page text and search result sets.
//!
//! Both caches are content-addressed on disk:
//!
//! - `fetch_and_scrape/<slug>.<date>.<digest>.cache` holds extracted page text
//! - `web_search/<date>/<query-prefix>.<digest>.cache` holds JSON result sets
//!
//! Presence of a readable file is the only validity signal. Entries go stale
//! when the day rolls over and a new key is derived; old files are orphaned,
//! never deleted.

pub mod hash;
pub mod pages;
pub mod search;
pub mod store;

pub use pages::PageCache;
pub use search::QueryCache;

/// Today's date in local time, the day component of every cache key.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
