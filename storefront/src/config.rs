//! Configuration for the storefront client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a local `.env` file.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::environment::StoreSettings;

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "storefront=info,storefront_api=info,storefront_runtime=info";

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The backend URL is not an absolute http(s) URL
    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(String),

    /// A page size or step is zero
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    /// The request timeout is zero
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL (`STOREFRONT_API_URL`)
    pub api_url: String,
    /// Directory holding the bearer token file (`STOREFRONT_TOKEN_DIR`);
    /// the token is kept in memory when unset
    pub token_dir: Option<PathBuf>,
    /// Per-request timeout (`STOREFRONT_REQUEST_TIMEOUT_SECS`, default 30)
    pub request_timeout: Duration,
    /// Catalog page size (`STOREFRONT_CATALOG_PAGE_SIZE`, default 10)
    pub catalog_page_size: u32,
    /// Initial landing page size (`STOREFRONT_HOME_PAGE_SIZE`, default 8)
    pub home_page_size: u32,
    /// Landing page growth per "load more" (`STOREFRONT_HOME_PAGE_STEP`, default 8)
    pub home_page_step: u32,
    /// Live search debounce (`STOREFRONT_SEARCH_DEBOUNCE_MS`, default 500)
    pub search_debounce: Duration,
    /// Log filter (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let settings = StoreSettings::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_dir: None,
            request_timeout: Duration::from_secs(30),
            catalog_page_size: settings.catalog_page_size,
            home_page_size: settings.home_page_size,
            home_page_step: settings.home_page_step,
            search_debounce: settings.search_debounce,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults; call
    /// [`Config::validate`] before use.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: env::var("STOREFRONT_API_URL").unwrap_or(defaults.api_url),
            token_dir: env::var("STOREFRONT_TOKEN_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            request_timeout: parsed("STOREFRONT_REQUEST_TIMEOUT_SECS")
                .map_or(defaults.request_timeout, Duration::from_secs),
            catalog_page_size: parsed("STOREFRONT_CATALOG_PAGE_SIZE")
                .unwrap_or(defaults.catalog_page_size),
            home_page_size: parsed("STOREFRONT_HOME_PAGE_SIZE").unwrap_or(defaults.home_page_size),
            home_page_step: parsed("STOREFRONT_HOME_PAGE_STEP").unwrap_or(defaults.home_page_step),
            search_debounce: parsed("STOREFRONT_SEARCH_DEBOUNCE_MS")
                .map_or(defaults.search_debounce, Duration::from_millis),
            log_filter: env::var("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// Check the configuration for values the stores cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rest = self
            .api_url
            .strip_prefix("https://")
            .or_else(|| self.api_url.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidApiUrl(self.api_url.clone()))?;
        if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        for (name, value) in [
            ("Catalog page size", self.catalog_page_size),
            ("Home page size", self.home_page_size),
            ("Home page step", self.home_page_step),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroValue(name));
            }
        }

        Ok(())
    }

    /// Store tuning derived from this configuration
    #[must_use]
    pub const fn settings(&self) -> StoreSettings {
        StoreSettings {
            catalog_page_size: self.catalog_page_size,
            home_page_size: self.home_page_size,
            home_page_step: self.home_page_step,
            search_debounce: self.search_debounce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.catalog_page_size, 10);
        assert_eq!(config.home_page_size, 8);
        assert_eq!(config.search_debounce, Duration::from_millis(500));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = Config {
            api_url: "localhost:5000".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidApiUrl(_))));

        let config = Config {
            api_url: "http://".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidApiUrl(_))));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = Config {
            home_page_step: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroValue("Home page step")));
    }

    #[test]
    fn test_settings_follow_config() {
        let config = Config {
            catalog_page_size: 24,
            ..Config::default()
        };
        assert_eq!(config.settings().catalog_page_size, 24);
    }
}
