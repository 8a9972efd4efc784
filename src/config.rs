//! Configuration loading and validation
//!
//! Supports YAML configuration files with validation. All fields have
//! defaults so a missing file or empty document still yields a working
//! resolver pointed at the local server.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

fn default_server() -> SocketAddr {
    "127.0.0.1:53".parse().expect("static address")
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_in_flight() -> usize {
    256
}

fn default_cache_enabled() -> bool {
    true
}

fn default_max_cache_ttl_secs() -> u64 {
    300
}

/// Resolver configuration
///
/// # Example
///
/// ```
/// use stubdns::config::Config;
///
/// let config = Config::default()
///     .with_server("9.9.9.9:53".parse().unwrap())
///     .with_timeout_ms(2000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upstream resolver address
    #[serde(default = "default_server")]
    pub server: SocketAddr,

    /// Per-query deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound on simultaneously open query sessions. Keeps a burst of
    /// lookups from exhausting local ports and descriptors.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Whether resolved answers are cached by (hostname, record type)
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Ceiling applied to answer TTLs when caching
    #[serde(default = "default_max_cache_ttl_secs")]
    pub max_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: default_timeout_ms(),
            max_in_flight: default_max_in_flight(),
            cache_enabled: default_cache_enabled(),
            max_cache_ttl_secs: default_max_cache_ttl_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be greater than 0".to_string()));
        }
        if self.max_in_flight == 0 {
            return Err(Error::Config(
                "max_in_flight must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the upstream resolver address
    pub fn with_server(mut self, server: SocketAddr) -> Self {
        self.server = server;
        self
    }

    /// Set the per-query deadline
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the session admission limit
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Enable or disable the answer cache
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Per-query deadline as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL ceiling as a [`Duration`]
    pub fn max_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.max_cache_ttl_secs)
    }
}
