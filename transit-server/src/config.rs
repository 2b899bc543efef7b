//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::feed::FeedConfig;
use crate::routing::{DEFAULT_BASE_URL, RoutingConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_POLL_SECS: u64 = 15;
const DEFAULT_OSRM_TIMEOUT_SECS: u64 = 10;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got {value}")]
    InvalidSeconds { var: &'static str, value: String },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub feed: FeedConfig,
    /// `None` disables the road-routing stage
    pub routing: Option<RoutingConfig>,
    /// `None` uses the bundled stops
    pub stops_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("TRANSIT_BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "TRANSIT_BIND_ADDR",
                value,
            })?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::InvalidAddr {
                    var: "TRANSIT_BIND_ADDR",
                    value: DEFAULT_BIND_ADDR.to_string(),
                })?,
        };

        let poll_secs = seconds(&lookup, "TRANSIT_FEED_POLL_SECS", DEFAULT_POLL_SECS)?;
        let mut feed = FeedConfig::new().with_poll_interval(Duration::from_secs(poll_secs));
        if let Some(url) = lookup("TRANSIT_FEED_URL").filter(|u| !u.trim().is_empty()) {
            feed = feed.with_url(url.trim());
        }

        let osrm_timeout = seconds(&lookup, "OSRM_TIMEOUT_SECS", DEFAULT_OSRM_TIMEOUT_SECS)?;
        let base_url = lookup("OSRM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let routing = (!base_url.trim().is_empty()).then(|| {
            RoutingConfig::new()
                .with_base_url(base_url.trim())
                .with_timeout(osrm_timeout)
        });

        let stops_file = lookup("TRANSIT_STOPS_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            feed,
            routing,
            stops_file,
        })
    }
}

fn seconds<L>(lookup: &L, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidSeconds { var, value }),
        },
    }
}
