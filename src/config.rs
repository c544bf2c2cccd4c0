//! Configuration Module
//!
//! Handles loading and validating Pokedex configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{ReadMode, DEFAULT_INTERVAL_SECS};
use crate::error::{PokedexError, Result};

/// Default PokeAPI root
pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2/";

/// Pokedex configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the PokeAPI
    pub api_base: String,
    /// Cache sweep interval (and entry TTL) in seconds
    pub cache_interval: u64,
    /// Report entries past their TTL as misses even before they are swept
    pub strict_reads: bool,
    /// Per-request HTTP timeout in seconds
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POKEDEX_API_BASE` - PokeAPI root (default: https://pokeapi.co/api/v2/)
    /// - `POKEDEX_CACHE_INTERVAL_SECS` - Cache sweep interval (default: 90)
    /// - `POKEDEX_STRICT_READS` - `true`/`1` to hide stale entries (default: off)
    /// - `POKEDEX_HTTP_TIMEOUT_SECS` - HTTP timeout (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: env::var("POKEDEX_API_BASE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base),
            cache_interval: env::var("POKEDEX_CACHE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_interval),
            strict_reads: env::var("POKEDEX_STRICT_READS")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict_reads),
            http_timeout: env::var("POKEDEX_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout),
        }
    }

    /// Rejects values the cache or HTTP client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_interval == 0 {
            return Err(PokedexError::InvalidConfig(
                "POKEDEX_CACHE_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if self.http_timeout == 0 {
            return Err(PokedexError::InvalidConfig(
                "POKEDEX_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_interval(&self) -> Duration {
        Duration::from_secs(self.cache_interval)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    pub fn read_mode(&self) -> ReadMode {
        if self.strict_reads {
            ReadMode::Strict
        } else {
            ReadMode::Lazy
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            cache_interval: DEFAULT_INTERVAL_SECS,
            strict_reads: false,
            http_timeout: 10,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
