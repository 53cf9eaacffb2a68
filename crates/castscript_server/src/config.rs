//! HTTP service configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Settings for the HTTP service, the `[server]` section of `castscript.toml`.
///
/// # Examples
///
/// ```
/// use castscript_server::ServerConfig;
///
/// let config = ServerConfig::default().with_bind("0.0.0.0:8080");
/// assert_eq!(config.bind(), "0.0.0.0:8080");
/// assert_eq!(*config.body_limit_bytes(), 20 * 1024 * 1024);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_", into)]
#[builder(default, setter(into))]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    bind: String,

    /// Largest accepted request body (bytes)
    #[serde(default = "default_body_limit_bytes")]
    body_limit_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_body_limit_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ServerConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}
