//! Page cache: extracted page text keyed by URL and day.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::hash::page_cache_file_name;
use super::store;
use crate::Error;

/// Subdirectory of the cache root holding page text.
pub const PAGES_DIR: &str = "fetch_and_scrape";

/// Extracted page text stored as `fetch_and_scrape/<slug>.<date>.<digest>.cache`.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    /// Page cache under `cache_root`.
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self { dir: cache_root.as_ref().join(PAGES_DIR) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url` on `date`.
    pub fn path_for(&self, url: &str, date: NaiveDate) -> PathBuf {
        self.dir.join(page_cache_file_name(url, date))
    }

    /// Cached text for `url` on `date`, verbatim.
    pub async fn get(&self, url: &str, date: NaiveDate) -> Option<String> {
        let text = store::read_text(&self.path_for(url, date)).await?;
        tracing::debug!("page cache hit for {}", url);
        Some(text)
    }

    /// Store extracted text for `url` on `date`, creating the directory if needed.
    pub async fn put(&self, url: &str, date: NaiveDate, text: &str) -> Result<(), Error> {
        store::ensure_dir(&self.dir).await?;
        store::write_atomic(&self.path_for(url, date), text.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let root = tempfile::tempdir().unwrap();
        let cache = PageCache::new(root.path());

        assert!(cache.get("https://example.com/a", day()).await.is_none());

        cache.put("https://example.com/a", day(), "Heading\nBody text\n").await.unwrap();
        let text = cache.get("https://example.com/a", day()).await.unwrap();
        assert_eq!(text, "Heading\nBody text\n");
        assert!(cache.dir().ends_with(PAGES_DIR));
    }

    #[tokio::test]
    async fn test_entry_scoped_to_day() {
        let root = tempfile::tempdir().unwrap();
        let cache = PageCache::new(root.path());
        cache.put("https://example.com/a", day(), "old").await.unwrap();

        let tomorrow = day().succ_opt().unwrap();
        assert!(cache.get("https://example.com/a", tomorrow).await.is_none());
        assert!(cache.path_for("https://example.com/a", day()).exists());
    }

    #[tokio::test]
    async fn test_empty_text_is_a_valid_entry() {
        let root = tempfile::tempdir().unwrap();
        let cache = PageCache::new(root.path());
        cache.put("https://example.com/empty", day(), "").await.unwrap();
        assert_eq!(cache.get("https://example.com/empty", day()).await.as_deref(), Some(""));
    }
}
