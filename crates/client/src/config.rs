//! Client configuration.

use serde::Deserialize;

/// Base URL used when the configuration does not name a host.
pub const DEFAULT_HOST: &str = "http://localhost:5678";

/// Connection settings for a GridSlice cluster.
///
/// Deserializable so it can be embedded in a larger application config file.
/// The `baseUrl` / `base_url` spellings are accepted for `host` to keep old
/// configuration files working.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the cluster control API, e.g. `http://localhost:5678`.
    #[serde(alias = "baseUrl", alias = "base_url")]
    pub host: Option<String>,

    /// Per-request transport timeout in milliseconds. `None` leaves the HTTP
    /// client's default in place (no timeout).
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    /// Configuration pointing at the given host, everything else default.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// The configured host, falling back to [`DEFAULT_HOST`].
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }
}
