//! Server configuration.
//!
//! Every setting has a default and can be overridden from the environment:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `TRANSIT_ADDR` | bind address, e.g. `0.0.0.0:3000` |
//! | `TRANSIT_DATASET` | path to the dataset JSON file |
//! | `TRANSIT_CORS_ORIGINS` | comma-separated allowed origins |
//! | `TRANSIT_CACHE_TTL_SECS` | lifetime of cached networks |
//! | `TRANSIT_CACHE_CAPACITY` | cached networks kept per kind |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Origins allowed by default: the local front-end dev servers.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:8000",
    "http://localhost:4000",
    "http://localhost:5173",
];

/// Error raised for a malformed environment variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    reason: String,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Dataset file served by the provider.
    pub dataset: PathBuf,

    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,

    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            dataset: PathBuf::from("data/network.json"),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `TRANSIT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("TRANSIT_ADDR") {
            config.addr = addr.trim().parse().map_err(|e| ConfigError {
                var: "TRANSIT_ADDR",
                reason: format!("{e}"),
            })?;
        }

        if let Some(path) = lookup("TRANSIT_DATASET") {
            config.dataset = PathBuf::from(path);
        }

        if let Some(origins) = lookup("TRANSIT_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(ttl) = lookup("TRANSIT_CACHE_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|e| ConfigError {
                var: "TRANSIT_CACHE_TTL_SECS",
                reason: format!("{e}"),
            })?;
            config.cache.ttl = Duration::from_secs(secs);
        }

        if let Some(capacity) = lookup("TRANSIT_CACHE_CAPACITY") {
            config.cache.max_capacity = capacity.trim().parse().map_err(|e| ConfigError {
                var: "TRANSIT_CACHE_CAPACITY",
                reason: format!("{e}"),
            })?;
        }

        Ok(config)
    }
}
