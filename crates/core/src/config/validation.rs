//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `user_agent` or `cache_dir` is empty
    /// - `search.max_results` is outside 1..=50
    /// - `search.max_words` is 0
    /// - `search.timeout` is outside 1..=300 seconds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_dir".into(), reason: "must not be empty".into() });
        }

        if !(1..=50).contains(&self.search.max_results) {
            return Err(ConfigError::Invalid {
                field: "search.max_results".into(),
                reason: "must be between 1 and 50".into(),
            });
        }

        if self.search.max_words == 0 {
            return Err(ConfigError::Invalid {
                field: "search.max_words".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if !(1..=300).contains(&self.search.timeout) {
            return Err(ConfigError::Invalid {
                field: "search.timeout".into(),
                reason: "must be between 1 and 300 seconds".into(),
            });
        }

        if self.max_images > 0 && self.search.max_words < 10 * self.max_images {
            tracing::warn!(
                max_images = self.max_images,
                max_words = self.search.max_words,
                "image links may consume the whole default word budget"
            );
        }

        Ok(())
    }
}
