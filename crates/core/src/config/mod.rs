//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WEBSIFT_*)
//! 2. TOML config file (if WEBSIFT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::params::SearchParams;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WEBSIFT_*), nested keys split on `__`
/// 2. TOML config file (if WEBSIFT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory holding `web_search/` and `fetch_and_scrape/`.
    ///
    /// Set via WEBSIFT_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// User-Agent string for page fetches and provider requests.
    ///
    /// Set via WEBSIFT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read per fetched page.
    ///
    /// Set via WEBSIFT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Brave API subscription token.
    ///
    /// Set via WEBSIFT_BRAVE_API_KEY environment variable.
    /// Required only when the brave provider is selected.
    #[serde(default)]
    pub brave_api_key: Option<String>,

    /// Base URL of a SearXNG instance.
    ///
    /// Set via WEBSIFT_SEARXNG_URL environment variable.
    #[serde(default)]
    pub searxng_url: Option<String>,

    /// Hosts whose results are dropped, matched as whole host labels.
    ///
    /// Set via WEBSIFT_EXCLUDED_DOMAINS environment variable (e.g. `[google,bing.com]`).
    #[serde(default = "default_excluded_domains")]
    pub excluded_domains: Vec<String>,

    /// Append the page's canonical link to extracted text.
    #[serde(default)]
    pub include_source_link: bool,

    /// Maximum image links kept per extracted page.
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Defaults for search calls that do not override them.
    ///
    /// Set via WEBSIFT_SEARCH__<FIELD>, e.g. WEBSIFT_SEARCH__MAX_RESULTS=3.
    #[serde(default)]
    pub search: SearchParams,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./.scrape_cache")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 websift/0.1"
        .into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_excluded_domains() -> Vec<String> {
    vec!["google".into()]
}

fn default_max_images() -> usize {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            brave_api_key: None,
            searxng_url: None,
            excluded_domains: default_excluded_domains(),
            include_source_link: false,
            max_images: default_max_images(),
            search: SearchParams::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WEBSIFT_`
    /// 2. TOML file from `WEBSIFT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WEBSIFT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WEBSIFT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if Brave API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Brave API key is not set or empty.
    pub fn require_brave_api_key(&self) -> Result<&str, ConfigError> {
        self.brave_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "brave_api_key".into(),
                hint: "Set WEBSIFT_BRAVE_API_KEY environment variable".into(),
            })
    }

    /// Check if a SearXNG instance is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no SearXNG URL is set.
    pub fn require_searxng_url(&self) -> Result<&str, ConfigError> {
        self.searxng_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "searxng_url".into(),
                hint: "Set WEBSIFT_SEARXNG_URL environment variable".into(),
            })
    }
}
