//! Configuration loading and representation.
//!
//! Both binaries read their settings from the environment once at start-up.
//! `from_lookup` takes any key → value function so tests can feed a map.

use std::net::SocketAddr;

use thiserror::Error;

use shareit_core::DateTimeFormat;
use shareit_core::time::{DEFAULT_PATTERN, DEFAULT_ZONE_OFFSET};

pub const SERVER_ADDR: &str = "SHAREIT_SERVER_ADDR";
pub const GATEWAY_ADDR: &str = "SHAREIT_GATEWAY_ADDR";
pub const SERVER_URL: &str = "SHAREIT_SERVER_URL";
pub const USE_PERSISTENT_STORES: &str = "USE_PERSISTENT_STORES";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const ZONE_OFFSET: &str = "SHAREIT_ZONE_OFFSET";
pub const DATE_FORMAT: &str = "SHAREIT_DATE_FORMAT";

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:9090";
const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SERVER_URL: &str = "http://localhost:9090";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Which store backs the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres { url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub datetime: DateTimeFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_addr(&lookup, SERVER_ADDR, DEFAULT_SERVER_ADDR)?;

        let persistent = match lookup(USE_PERSISTENT_STORES) {
            Some(v) => v.trim().parse::<bool>().map_err(|e| ConfigError::Invalid {
                key: USE_PERSISTENT_STORES,
                reason: e.to_string(),
            })?,
            None => false,
        };

        let store = if persistent {
            let url = lookup(DATABASE_URL).ok_or(ConfigError::Missing(DATABASE_URL))?;
            let max_connections = match lookup(DATABASE_MAX_CONNECTIONS) {
                Some(v) => v.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                    key: DATABASE_MAX_CONNECTIONS,
                    reason: e.to_string(),
                })?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            StoreBackend::Postgres {
                url,
                max_connections,
            }
        } else {
            StoreBackend::InMemory
        };

        Ok(Self {
            bind_addr,
            store,
            datetime: parse_datetime(&lookup)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    /// Base URL of the server tier, without trailing slash.
    pub server_url: String,
    pub datetime: DateTimeFormat,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_addr(&lookup, GATEWAY_ADDR, DEFAULT_GATEWAY_ADDR)?;

        let server_url = lookup(SERVER_URL).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = server_url.trim().trim_end_matches('/').to_string();
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: SERVER_URL,
                reason: format!("'{server_url}' is not an http(s) URL"),
            });
        }

        Ok(Self {
            bind_addr,
            server_url,
            datetime: parse_datetime(&lookup)?,
        })
    }
}

fn parse_addr(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<SocketAddr, ConfigError> {
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_datetime(lookup: &impl Fn(&str) -> Option<String>) -> Result<DateTimeFormat, ConfigError> {
    let pattern = lookup(DATE_FORMAT).unwrap_or_else(|| DEFAULT_PATTERN.to_string());
    let zone = lookup(ZONE_OFFSET).unwrap_or_else(|| DEFAULT_ZONE_OFFSET.to_string());
    DateTimeFormat::from_settings(&pattern, &zone).map_err(|e| ConfigError::Invalid {
        key: ZONE_OFFSET,
        reason: e.to_string(),
    })
}
