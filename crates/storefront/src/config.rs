//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TECHSTORE_DATA_DIR` - Profile directory for durable storage (default: .techstore)
//! - `TECHSTORE_CART_KEY` - Storage key of the cart snapshot (default: cart)
//! - `TECHSTORE_CATALOG_URL` - Base URL of the product API (default: <https://dummyjson.com>)
//! - `TECHSTORE_CATALOG_PAGE_SIZE` - Products per search (default: 8)
//! - `TECHSTORE_CATALOG_CACHE_TTL_SECS` - Search cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of errors sent to Sentry (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".techstore";
const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";
const DEFAULT_PAGE_SIZE: &str = "8";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const MAX_PAGE_SIZE: u32 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Profile directory holding the storage document
    pub data_dir: PathBuf,
    /// Storage key of the cart snapshot
    pub cart_key: String,
    /// Product catalog API configuration
    pub catalog: CatalogConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the product API
    pub base_url: Url,
    /// Number of products requested per search
    pub page_size: u32,
    /// How long search results stay cached
    pub cache_ttl: Duration,
}

impl CatalogConfig {
    /// Catalog configuration for `base_url` with the default page size and
    /// cache lifetime.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            page_size: 8,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<String>,
    /// Environment name reported with events
    pub environment: Option<String>,
    /// Fraction of error events sent
    pub sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let data_dir = PathBuf::from(env.or_default("TECHSTORE_DATA_DIR", DEFAULT_DATA_DIR));
        let cart_key = env.or_default("TECHSTORE_CART_KEY", crate::storage::keys::CART);
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "TECHSTORE_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            data_dir,
            cart_key,
            catalog: CatalogConfig::from_env(&env)?,
            sentry: SentryConfig::from_env(&env)?,
        })
    }
}

impl CatalogConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "TECHSTORE_CATALOG_URL",
            &env.or_default("TECHSTORE_CATALOG_URL", DEFAULT_CATALOG_URL),
        )?;

        let page_size = env
            .or_default("TECHSTORE_CATALOG_PAGE_SIZE", DEFAULT_PAGE_SIZE)
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TECHSTORE_CATALOG_PAGE_SIZE".to_string(), e.to_string())
            })?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar(
                "TECHSTORE_CATALOG_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let ttl_secs = env
            .or_default("TECHSTORE_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "TECHSTORE_CATALOG_CACHE_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            base_url,
            page_size,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl SentryConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let sample_rate = env
            .or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;
        if !(0.0..=1.0).contains(&sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(Self {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the config sections.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; empty values count as absent.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse an http(s) base URL.
///
/// Shared with the admin crate, whose API base URL follows the same rules.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the value is not an absolute
/// http(s) URL.
pub fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".techstore"));
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.catalog.base_url.as_str(), "https://dummyjson.com/");
        assert_eq!(config.catalog.page_size, 8);
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert!(config.sentry.dsn.is_none());
        assert!((config.sentry.sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TECHSTORE_DATA_DIR", "/tmp/profile"),
            ("TECHSTORE_CART_KEY", "cart-v2"),
            ("TECHSTORE_CATALOG_URL", "http://localhost:8080"),
            ("TECHSTORE_CATALOG_PAGE_SIZE", "20"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/profile"));
        assert_eq!(config.cart_key, "cart-v2");
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.catalog.page_size, 20);
        assert!(config.sentry.dsn.is_some());
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = load(&[("TECHSTORE_DATA_DIR", ""), ("SENTRY_DSN", "  ")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".techstore"));
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_invalid_catalog_url() {
        assert!(matches!(
            load(&[("TECHSTORE_CATALOG_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[("TECHSTORE_CATALOG_URL", "ftp://example.com")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_invalid_page_size() {
        assert!(load(&[("TECHSTORE_CATALOG_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("TECHSTORE_CATALOG_PAGE_SIZE", "500")]).is_err());
        assert!(load(&[("TECHSTORE_CATALOG_PAGE_SIZE", "eight")]).is_err());
    }

    #[test]
    fn test_invalid_sample_rate() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "2.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "lots")]).is_err());
    }

    #[test]
    fn test_catalog_default_matches_env_defaults() {
        let from_env = load(&[]).unwrap().catalog;
        let default = CatalogConfig::new(Url::parse("https://dummyjson.com").unwrap());
        assert_eq!(from_env.base_url, default.base_url);
        assert_eq!(from_env.page_size, default.page_size);
        assert_eq!(from_env.cache_ttl, default.cache_ttl);
    }
}
