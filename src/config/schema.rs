//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::artifact::{PrepareError, PrepareOptions, PreparedResponse};

/// Root configuration for the artifact server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Artifacts to prepare and mount.
    pub artifacts: Vec<ArtifactConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One artifact mounted at a fixed path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactConfig {
    /// Request path the artifact is served at (e.g., "/client.js").
    pub path: String,

    /// File to read the body from.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Inline body: a string, or an array of byte values.
    #[serde(default)]
    pub body: Option<toml::Value>,

    /// Response headers, in emission order.
    #[serde(default)]
    pub headers: toml::Table,

    /// Produce a gzip form in the background.
    #[serde(default = "default_gzip")]
    pub gzip: bool,

    /// Max-age in seconds for a non-duration `Cache-Control` value.
    #[serde(default)]
    pub cache: Option<u64>,
}

fn default_gzip() -> bool {
    true
}

impl ArtifactConfig {
    /// Header pairs with scalar values rendered as text.
    ///
    /// Returns the offending header name if a value is an array or table.
    pub fn header_pairs(&self) -> Result<Vec<(String, String)>, String> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Integer(n) => n.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Datetime(d) => d.to_string(),
                    toml::Value::Array(_) | toml::Value::Table(_) => return Err(name.clone()),
                };
                Ok((name.clone(), text))
            })
            .collect()
    }

    pub fn options(&self) -> PrepareOptions {
        PrepareOptions {
            gzip: self.gzip,
            cache: self.cache,
        }
    }

    /// Read the body and prepare the artifact. Must run after validation.
    pub fn prepare(&self) -> Result<Arc<PreparedResponse>, PrepareError> {
        let headers = self
            .header_pairs()
            .map_err(|name| PrepareError::InvalidHeaderValue { name })?;

        match (&self.file, &self.body) {
            (Some(file), _) => PreparedResponse::from_file(file, headers, self.options()),
            (None, Some(body)) => {
                PreparedResponse::from_value(body.clone(), headers, self.options())
            }
            (None, None) => Err(PrepareError::InvalidBodyType {
                found: "nothing".to_string(),
            }),
        }
    }
}
