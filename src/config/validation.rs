//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate or malformed artifact paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before any artifact is prepared

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("artifact path '{0}' must start with '/'")]
    RelativePath(String),

    #[error("artifact path '{0}' is mounted more than once")]
    DuplicatePath(String),

    #[error("artifact '{0}' must set exactly one of 'file' or 'body'")]
    BodySource(String),

    #[error("artifact '{path}' header '{header}' must be a scalar value")]
    HeaderValue { path: String, header: String },
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for artifact in &config.artifacts {
        if !artifact.path.starts_with('/') {
            errors.push(ValidationError::RelativePath(artifact.path.clone()));
        }
        if !seen.insert(artifact.path.as_str()) {
            errors.push(ValidationError::DuplicatePath(artifact.path.clone()));
        }
        if artifact.file.is_some() == artifact.body.is_some() {
            errors.push(ValidationError::BodySource(artifact.path.clone()));
        }
        if let Err(header) = artifact.header_pairs() {
            errors.push(ValidationError::HeaderValue {
                path: artifact.path.clone(),
                header,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
