//! Query cache: assembled result sets keyed by query, parameters and day.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;

use super::hash::{query_cache_file_name, query_cache_key};
use super::store;
use crate::Error;
use crate::model::SearchResultSet;

/// Subdirectory of the cache root holding serialized result sets.
pub const SEARCH_DIR: &str = "web_search";

/// Serialized result sets stored as `web_search/<date>/<query-prefix>.<digest>.cache`.
#[derive(Debug, Clone)]
pub struct QueryCache {
    dir: PathBuf,
}

impl QueryCache {
    /// Query cache under `cache_root`.
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self { dir: cache_root.as_ref().join(SEARCH_DIR) }
    }

    /// Path of the entry for `query` with `params` (a JSON object) on `date`.
    pub fn path_for(&self, query: &str, params: &Value, date: NaiveDate) -> PathBuf {
        let key = query_cache_key(query, params);
        self.dir
            .join(date.format("%Y-%m-%d").to_string())
            .join(query_cache_file_name(query, &key))
    }

    /// Load a stored result set.
    ///
    /// A missing or corrupt entry is a miss, never an error.
    pub async fn load(&self, path: &Path) -> Option<SearchResultSet> {
        let raw = store::read_text(path).await?;
        match serde_json::from_str(&raw) {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::warn!("ignoring corrupt search cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Persist a result set at `path`, creating the day directory if needed.
    pub async fn store(&self, path: &Path, set: &SearchResultSet) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            store::ensure_dir(parent).await?;
        }
        let json = serde_json::to_vec(set)?;
        store::write_atomic(path, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchResultEntry;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn sample_set() -> SearchResultSet {
        let mut entry = SearchResultEntry::new("Rust", "https://www.rust-lang.org", "A language");
        entry.text = Some("Rust is fast".into());
        SearchResultSet::new(vec![entry], 9)
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let root = tempfile::tempdir().unwrap();
        let cache = QueryCache::new(root.path());
        let path = cache.path_for("rust", &json!({"max_results": 5}), day());

        assert!(cache.load(&path).await.is_none());
        cache.store(&path, &sample_set()).await.unwrap();
        assert_eq!(cache.load(&path).await, Some(sample_set()));
    }

    #[test]
    fn test_path_layout() {
        let cache = QueryCache::new("/cache");
        let path = cache.path_for("rust async", &json!({}), day());
        let rendered = path.to_string_lossy();
        assert!(rendered.starts_with("/cache/web_search/2025-06-01/rust+async."));
        assert!(rendered.ends_with(".cache"));
    }

    #[test]
    fn test_path_ignores_param_order() {
        let cache = QueryCache::new("/cache");
        let a = cache.path_for("q", &json!({"a": 1, "b": 2}), day());
        let b = cache.path_for("q", &json!({"b": 2, "a": 1}), day());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_miss() {
        let root = tempfile::tempdir().unwrap();
        let cache = QueryCache::new(root.path());
        let path = cache.path_for("rust", &json!({}), day());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert!(cache.load(&path).await.is_none());
    }
}
