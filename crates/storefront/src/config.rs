//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FRUITMALL_API_URL` - Backend base URL (default: `http://localhost:8080/api`)
//! - `FRUITMALL_API_TIMEOUT_MS` - Request timeout in milliseconds (default: 10000)
//! - `FRUITMALL_TOKEN_PATH` - Persisted client storage file
//!   (default: `$HOME/.fruitmall/storage.json`)
//! - `FRUITMALL_SHIPPING_FEE` - Flat shipping fee in KRW (default: 3000)
//! - `FRUITMALL_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping in KRW (default: 100000)
//! - `FRUITMALL_CACHE_TTL_SECS` - Product and category cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use fruit_mall_core::Price;
use thiserror::Error;
use url::Url;

use crate::cart::ShippingPolicy;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const STORAGE_DIR: &str = ".fruitmall";
const STORAGE_FILE: &str = "storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// File holding the persisted auth token
    pub token_path: PathBuf,
    /// Shipping fee rules applied to cart totals
    pub shipping: ShippingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Time-to-live of cached product and category lookups
    pub cache_ttl: Duration,
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with default timeout and cache TTL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_value::<Url>(
            "FRUITMALL_API_URL",
            &get_env_or_default("FRUITMALL_API_URL", DEFAULT_API_URL),
        )?;
        let timeout_ms = get_parsed_env("FRUITMALL_API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let cache_ttl_secs = get_parsed_env("FRUITMALL_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        let defaults = ShippingPolicy::default();
        let shipping = ShippingPolicy {
            flat_fee: get_parsed_env("FRUITMALL_SHIPPING_FEE", defaults.flat_fee)?,
            free_threshold: get_parsed_env(
                "FRUITMALL_FREE_SHIPPING_THRESHOLD",
                defaults.free_threshold,
            )?,
        };
        validate_shipping(&shipping)?;

        let token_path = get_optional_env("FRUITMALL_TOKEN_PATH")
            .map_or_else(default_token_path, PathBuf::from);

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_millis(timeout_ms),
                cache_ttl: Duration::from_secs(cache_ttl_secs),
            },
            token_path,
            shipping,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for a backend at `base_url`, storing the token at `token_path`.
    ///
    /// Everything else takes its default value. Useful for tests and embedding.
    #[must_use]
    pub fn new(base_url: Url, token_path: PathBuf) -> Self {
        Self {
            api: ApiConfig::new(base_url),
            token_path,
            shipping: ShippingPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

/// Default location of the persisted storage file.
///
/// Falls back to a path relative to the working directory when `HOME` is unset.
#[must_use]
pub fn default_token_path() -> PathBuf {
    get_optional_env("HOME").map_or_else(
        || PathBuf::from(STORAGE_DIR).join(STORAGE_FILE),
        |home| PathBuf::from(home).join(STORAGE_DIR).join(STORAGE_FILE),
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable parsed as `T`, or `default` when unset.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn validate_shipping(policy: &ShippingPolicy) -> Result<(), ConfigError> {
    if policy.flat_fee < Price::ZERO {
        return Err(ConfigError::InvalidEnvVar(
            "FRUITMALL_SHIPPING_FEE".to_string(),
            "must not be negative".to_string(),
        ));
    }
    if policy.free_threshold < Price::ZERO {
        return Err(ConfigError::InvalidEnvVar(
            "FRUITMALL_FREE_SHIPPING_THRESHOLD".to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(())
}
