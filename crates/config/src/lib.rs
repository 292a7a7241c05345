//! openai-proxy configuration structures to map the openai-proxy.toml configuration.

#![deny(missing_docs)]

mod auth;
mod headers;
mod loader;
mod method;
mod upstream;

pub use auth::AuthConfig;
pub use headers::HeaderName;
pub use method::HttpMethod;
pub use upstream::{HeaderNames, UpstreamConfig};

use std::{borrow::Cow, net::SocketAddr, path::Path, time::Duration};

use duration_str::deserialize_duration;
use serde::Deserialize;

/// Main configuration structure for the proxy.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    pub server: ServerConfig,
    /// Token service configuration settings.
    pub auth: AuthConfig,
    /// Backend service configuration settings.
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }
}

/// HTTP server configuration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// Deadline for a single backend call, connection to final byte.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Health endpoint configuration.
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            timeout: Duration::from_secs(10),
            health: HealthConfig::default(),
        }
    }
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the health endpoint is enabled.
    pub enabled: bool,
    /// The path for the health endpoint.
    pub path: Cow<'static, str>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: Cow::Borrowed("/health"),
        }
    }
}
