//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Event store
//!
//! Click events are kept in memory unless Redis is configured, either as a
//! full URL or from individual components:
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//!
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `BASE_URL` - Prefix of rewritten links (default: `http://localhost:3000/`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, min: 100)
//! - `CLICK_WORKER_CONCURRENCY` - Consumer loops (default: 4)
//! - `CLICK_RETRY_BASE_MS` - Backoff unit in milliseconds (default: 1000)
//! - `CLICK_RETRY_MAX_DELAY_MS` - Backoff ceiling in milliseconds (default: 30000)
//! - `CLICK_MAX_RETRIES` - Retries before a click is dead-lettered (default: 10)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::infrastructure::queue::{QueueConfig, RetryPolicy};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Public prefix joined with a short id to form rewritten links.
    pub base_url: String,
    pub redis_url: Option<String>,
    pub log_level: String,
    pub log_format: String,
    pub click_queue_capacity: usize,
    /// Number of consumer loops draining the click queue.
    pub click_worker_concurrency: usize,
    pub click_retry_base_ms: u64,
    pub click_retry_max_delay_ms: u64,
    pub click_max_retries: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000/".to_string());
        let redis_url = Self::load_redis_url();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            listen_addr,
            base_url,
            redis_url,
            log_level,
            log_format,
            click_queue_capacity: parse_var("CLICK_QUEUE_CAPACITY", 10_000)?,
            click_worker_concurrency: parse_var("CLICK_WORKER_CONCURRENCY", 4)?,
            click_retry_base_ms: parse_var("CLICK_RETRY_BASE_MS", 1000)?,
            click_retry_max_delay_ms: parse_var("CLICK_RETRY_MAX_DELAY_MS", 30_000)?,
            click_max_retries: parse_var("CLICK_MAX_RETRIES", 10)?,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `click_queue_capacity` is outside 100..=1_000_000
    /// - `click_worker_concurrency` is outside 1..=256
    /// - retry delays are zero or the ceiling is below the base
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` or `base_url` is invalid
    pub fn validate(&self) -> Result<()> {
        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.click_worker_concurrency == 0 || self.click_worker_concurrency > 256 {
            anyhow::bail!(
                "CLICK_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.click_worker_concurrency
            );
        }

        if self.click_retry_base_ms == 0 {
            anyhow::bail!("CLICK_RETRY_BASE_MS must be greater than 0");
        }

        if self.click_retry_max_delay_ms < self.click_retry_base_ms {
            anyhow::bail!(
                "CLICK_RETRY_MAX_DELAY_MS ({}) must not be below CLICK_RETRY_BASE_MS ({})",
                self.click_retry_max_delay_ms,
                self.click_retry_base_ms
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let base_url = self.parsed_base_url()?;
        if base_url.cannot_be_a_base() || !base_url.path().ends_with('/') {
            anyhow::bail!(
                "BASE_URL must be an absolute URL ending with '/', got '{}'",
                self.base_url
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        Ok(())
    }

    /// Parses [`Config::base_url`].
    ///
    /// # Errors
    ///
    /// Returns an error if `BASE_URL` is not an absolute URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid BASE_URL '{}'", self.base_url))
    }

    /// Queue settings derived from the click-related variables.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            capacity: self.click_queue_capacity,
            consumers: self.click_worker_concurrency,
            retry: RetryPolicy::new(
                Duration::from_millis(self.click_retry_base_ms),
                Duration::from_millis(self.click_retry_max_delay_ms),
                self.click_max_retries,
            ),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Event store: Redis {}", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Event store: in-memory");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
        tracing::info!("  Click consumers: {}", self.click_worker_concurrency);
        tracing::info!(
            "  Click retry: {}ms steps, {}ms ceiling, {} retries",
            self.click_retry_base_ms,
            self.click_retry_max_delay_ms,
            self.click_max_retries
        );
    }
}

/// Parses an optional environment variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000/".to_string(),
            redis_url: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            click_queue_capacity: 10_000,
            click_worker_concurrency: 4,
            click_retry_base_ms: 1000,
            click_retry_max_delay_ms: 30_000,
            click_max_retries: 10,
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );

        assert_eq!(
            mask_connection_string("redis://localhost:6379/0"),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.click_queue_capacity = 50;
        assert!(config.validate().is_err());
        config.click_queue_capacity = 10_000;

        config.click_worker_concurrency = 0;
        assert!(config.validate().is_err());
        config.click_worker_concurrency = 4;

        config.click_retry_max_delay_ms = 500;
        assert!(config.validate().is_err());
        config.click_retry_max_delay_ms = 30_000;

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
        config.base_url = "https://s.example.com".to_string();
        assert!(config.validate().is_ok());
        config.base_url = "https://s.example.com/r".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:3000/".to_string();
        config.redis_url = Some("http://localhost".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_queue_config_from_settings() {
        let config = valid_config();

        let queue = config.queue_config();

        assert_eq!(queue.capacity, 10_000);
        assert_eq!(queue.consumers, 4);
        assert_eq!(queue.retry.delay(1), Duration::from_secs(1));
        assert_eq!(queue.retry.delay(100), Duration::from_secs(30));
        assert_eq!(queue.retry.max_retries, 10);
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("REDIS_URL");
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://:secret@redis-host:6380/1");

        // Empty password is treated as no password
        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::remove_var("REDIS_HOST");
            env::remove_var("REDIS_PORT");
            env::remove_var("REDIS_DB");
            env::remove_var("REDIS_PASSWORD");
        }
    }

    #[test]
    #[serial]
    fn test_redis_url_priority() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("REDIS_URL", "redis://from-url:6379/0");
            env::set_var("REDIS_HOST", "from-components");
        }

        let url = Config::load_redis_url().unwrap();

        assert!(url.contains("from-url"));
        assert!(!url.contains("from-components"));

        unsafe {
            env::remove_var("REDIS_URL");
            env::remove_var("REDIS_HOST");
        }
    }

    #[test]
    #[serial]
    fn test_numeric_variables() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CLICK_MAX_RETRIES", "3");
            env::set_var("CLICK_RETRY_BASE_MS", "250");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.click_max_retries, 3);
        assert_eq!(config.click_retry_base_ms, 250);

        unsafe {
            env::set_var("CLICK_MAX_RETRIES", "many");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("CLICK_MAX_RETRIES");
            env::remove_var("CLICK_RETRY_BASE_MS");
        }
    }
}
