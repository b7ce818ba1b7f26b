//! Search configuration
//!
//! Everything the fetch session needs is resolved here, once, before the session starts.
//! Core logic never reads the environment itself.

use std::time::Duration;

use crate::core::error::ConfigError;

/// Dataset endpoint for Texas professional license records.
pub const DEFAULT_ENDPOINT: &str = "https://data.texas.gov/resource/7358-krk7.json";

/// Environment variable holding the API access token.
pub const APP_TOKEN_ENV: &str = "APP_TOKEN";

/// Environment variable that overrides the dataset endpoint.
pub const ENDPOINT_ENV: &str = "LICENSE_API_URL";

/// Largest page the API is asked for in a single request.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// Largest page size accepted from the command line.
pub const MAX_PAGE_SIZE: usize = 50_000;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for one search run
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub app_token: String,
    /// Per-request timeout; `None` disables it
    pub timeout: Option<Duration>,
    /// Maximum records to emit; 0 means unlimited
    pub limit: usize,
    /// Page-size ceiling for each request
    pub page_size: usize,
}

impl SearchConfig {
    /// Build a config, rejecting a missing/blank token and an out-of-range page size.
    pub fn new(
        endpoint: impl Into<String>,
        app_token: Option<String>,
        timeout_secs: u64,
        limit: usize,
        page_size: usize,
    ) -> Result<Self, ConfigError> {
        let app_token = app_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSizeTooLarge { max: MAX_PAGE_SIZE });
        }

        Ok(Self {
            endpoint: endpoint.into(),
            app_token,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            limit,
            page_size,
        })
    }

    /// Page size of the first request, also used to size the record channel.
    pub fn effective_page_size(&self) -> usize {
        if self.limit > 0 && self.limit < self.page_size {
            self.limit
        } else {
            self.page_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, limit: usize, page_size: usize) -> Result<SearchConfig, ConfigError> {
        SearchConfig::new(
            DEFAULT_ENDPOINT,
            token.map(str::to_string),
            DEFAULT_TIMEOUT_SECS,
            limit,
            page_size,
        )
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(matches!(config(None, 0, 10), Err(ConfigError::MissingToken)));
        assert!(matches!(config(Some(""), 0, 10), Err(ConfigError::MissingToken)));
        assert!(matches!(config(Some("  "), 0, 10), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(matches!(config(Some("t"), 0, 0), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn test_oversized_page_size_is_rejected() {
        assert!(config(Some("t"), 0, MAX_PAGE_SIZE).is_ok());
        assert!(matches!(
            config(Some("t"), 0, MAX_PAGE_SIZE + 1),
            Err(ConfigError::PageSizeTooLarge { max: MAX_PAGE_SIZE })
        ));
        assert!(matches!(
            config(Some("t"), 0, usize::MAX),
            Err(ConfigError::PageSizeTooLarge { .. })
        ));
    }

    #[test]
    fn test_effective_page_size() {
        assert_eq!(config(Some("t"), 0, 5000).unwrap().effective_page_size(), 5000);
        assert_eq!(config(Some("t"), 10, 5000).unwrap().effective_page_size(), 10);
        assert_eq!(config(Some("t"), 9000, 5000).unwrap().effective_page_size(), 5000);
    }

    #[test]
    fn test_zero_timeout_disables_timeout() {
        let cfg = SearchConfig::new(DEFAULT_ENDPOINT, Some("t".into()), 0, 0, 1).unwrap();
        assert!(cfg.timeout.is_none());

        let cfg = SearchConfig::new(DEFAULT_ENDPOINT, Some("t".into()), 5, 0, 1).unwrap();
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
    }
}
