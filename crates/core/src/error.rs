//! Unified error types for websift.
//!
//! Only [`Error::MissingDependency`] and [`Error::ProviderFailed`] are meant to
//! cross the search pipeline boundary. Fetch and cache failures are recovered
//! locally, so the remaining variants surface from lower-level helpers and the
//! server tools.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the search pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required capability (search provider, API key) is not installed.
    #[error("MISSING_DEPENDENCY: {0}")]
    MissingDependency(String),

    /// The search provider rejected or failed the query.
    #[error("PROVIDER_FAILED: {0}")]
    ProviderFailed(String),

    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Cache file could not be read or written.
    #[error("CACHE_ERROR: {0}")]
    Cache(String),

    /// The blocking runtime for the synchronous entry point failed.
    #[error("RUNTIME_ERROR: {0}")]
    Runtime(String),
}

impl Error {
    /// Whether this error is one of the two kinds a search call may surface.
    pub fn is_search_failure(&self) -> bool {
        matches!(self, Error::MissingDependency(_) | Error::ProviderFailed(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Cache(format!("serialization failed: {err}"))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::MissingDependency(msg) => (-32000, msg.clone()),
            Error::ProviderFailed(msg) => (-32001, msg.clone()),
            Error::Cache(msg) => (-32002, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::Runtime(msg) => (-32603, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingDependency("provider brave".to_string());
        assert!(err.to_string().contains("MISSING_DEPENDENCY"));
        assert!(err.to_string().contains("provider brave"));
    }

    #[test]
    fn test_search_failure_kinds() {
        assert!(Error::MissingDependency("x".into()).is_search_failure());
        assert!(Error::ProviderFailed("x".into()).is_search_failure());
        assert!(!Error::HttpError("x".into()).is_search_failure());
        assert!(!Error::Cache("x".into()).is_search_failure());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::ProviderFailed("rate limited".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
    }

    #[test]
    fn test_io_error_becomes_cache_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Cache(_)));
    }
}
