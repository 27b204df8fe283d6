//! # Application State & Configuration
//!
//! The evaluator is stateless, so shared state is configuration only.
//! Configuration comes from the environment; malformed values fall back
//! to defaults with a warning rather than refusing to start.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Default request body limit: 64 KiB. A scenario is a handful of short
/// fields.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: IpAddr,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Build configuration from `ESHIELD_HOST`, `PORT` and
    /// `ESHIELD_BODY_LIMIT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: parse_or("ESHIELD_HOST", &lookup, defaults.host),
            port: parse_or("PORT", &lookup, defaults.port),
            body_limit_bytes: parse_or("ESHIELD_BODY_LIMIT", &lookup, defaults.body_limit_bytes),
        }
    }

    /// Socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, fallback = %default, "unparsable config value, using default");
            default
        }),
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
