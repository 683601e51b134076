//! Server configuration.
//!
//! Settings come from environment variables, each with a default:
//!
//! | Variable | Default |
//! |---|---|
//! | `SUBWAY_BIND_ADDR` | `127.0.0.1:3000` |
//! | `SUBWAY_DATA_FILE` | unset (memory only) |
//! | `SUBWAY_STATION_CACHE_TTL_SECS` | `300` |
//! | `SUBWAY_STATION_CACHE_CAPACITY` | `10000` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// An environment variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Configuration for the HTTP server and its storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Snapshot file for persistence. Without one, data is lost on exit.
    pub data_file: Option<PathBuf>,

    /// Station lookup cache settings.
    pub station_cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_file: None,
            station_cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a variable lookup function.
    ///
    /// Unset or empty variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("SUBWAY_BIND_ADDR") {
            config.bind_addr = parse("SUBWAY_BIND_ADDR", addr)?;
        }
        if let Some(path) = get("SUBWAY_DATA_FILE") {
            config.data_file = Some(PathBuf::from(path));
        }
        if let Some(secs) = get("SUBWAY_STATION_CACHE_TTL_SECS") {
            config.station_cache.ttl =
                Duration::from_secs(parse("SUBWAY_STATION_CACHE_TTL_SECS", secs)?);
        }
        if let Some(capacity) = get("SUBWAY_STATION_CACHE_CAPACITY") {
            config.station_cache.max_capacity = parse("SUBWAY_STATION_CACHE_CAPACITY", capacity)?;
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError { name, value })
}
