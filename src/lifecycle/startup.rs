//! Startup: turn validated configuration into mounted artifacts.

use std::sync::Arc;

use crate::artifact::PreparedResponse;
use crate::config::{ConfigError, ServerConfig};
use crate::observability::metrics;

/// An artifact together with the request path it is served at.
#[derive(Debug, Clone)]
pub struct MountedArtifact {
    pub path: String,
    pub artifact: Arc<PreparedResponse>,
}

/// Prepare every configured artifact. Stops at the first failure.
///
/// Must be called inside the runtime so compression starts in the background.
pub fn prepare_artifacts(config: &ServerConfig) -> Result<Vec<MountedArtifact>, ConfigError> {
    config
        .artifacts
        .iter()
        .map(|entry| -> Result<MountedArtifact, ConfigError> {
            let artifact = entry.prepare().map_err(|source| ConfigError::Artifact {
                path: entry.path.clone(),
                source,
            })?;

            tracing::info!(
                path = %entry.path,
                etag = %artifact.etag(),
                size = artifact.body().len(),
                gzip = entry.gzip,
                "Artifact mounted"
            );
            metrics::record_artifact_mounted();

            Ok(MountedArtifact {
                path: entry.path.clone(),
                artifact,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    #[tokio::test]
    async fn test_prepare_artifacts() {
        let config = parse_config(
            r#"
            [[artifacts]]
            path = "/"
            body = "<p>index</p>"
            headers = { content-type = "html" }

            [[artifacts]]
            path = "/bytes"
            body = [104, 105]
            "#,
        )
        .unwrap();

        let mounted = prepare_artifacts(&config).unwrap();
        assert_eq!(mounted.len(), 2);
        assert_eq!(mounted[0].path, "/");
        assert_eq!(mounted[1].artifact.body().as_bytes(), b"hi");
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let config = parse_config(
            r#"
            [[artifacts]]
            path = "/missing"
            file = "definitely/missing.html"
            "#,
        )
        .unwrap();

        let err = prepare_artifacts(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Artifact { ref path, .. } if path == "/missing"));
    }
}
