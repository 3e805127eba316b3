//! The prepared response artifact.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::watch;

use super::body::RawBody;
use super::compression::{gzip, keep_if_smaller, CompressionState, PendingRequest};
use super::fingerprint::fingerprint;
use super::headers::{Header, HeaderPipeline};

/// Errors raised while preparing an artifact.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The body was neither text nor a byte sequence.
    #[error("Body must be either text or bytes, got {found}")]
    InvalidBodyType { found: String },

    /// A header value read from configuration was not a scalar.
    #[error("Header {name} must have a string, number or boolean value")]
    InvalidHeaderValue { name: String },

    /// The body file could not be read.
    #[error("Failed to read body from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Construction-time options.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Produce a gzip form in the background.
    pub gzip: bool,
    /// Max-age in seconds used for a `Cache-Control` header whose value is
    /// not itself a duration.
    pub cache: Option<u64>,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            gzip: true,
            cache: None,
        }
    }
}

/// Outcome of checking compression readiness on behalf of a serve call.
pub(crate) enum Readiness<T> {
    /// Compression is in flight; the call was queued.
    Deferred,
    /// Compression has resolved with this gzip form (if any); the call is
    /// handed back to run now.
    Ready(Option<Bytes>, T),
}

/// An immutable, precomputed HTTP response.
///
/// Everything except the gzip form is available as soon as construction
/// returns. The gzip form is computed once on the blocking pool.
pub struct PreparedResponse {
    body: RawBody,
    etag: String,
    headers: Vec<Header>,
    gzip_enabled: bool,
    state: Mutex<CompressionState>,
    ready_tx: watch::Sender<bool>,
}

impl PreparedResponse {
    /// Prepare `body` with `headers` and default options.
    pub fn new<B, I, K, V>(body: B, headers: I) -> Arc<Self>
    where
        B: Into<RawBody>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_options(body, headers, PrepareOptions::default())
    }

    /// Prepare `body` with `headers`.
    ///
    /// Inside a Tokio runtime compression is scheduled in the background and
    /// this returns immediately. Outside one it runs inline.
    pub fn with_options<B, I, K, V>(body: B, headers: I, options: PrepareOptions) -> Arc<Self>
    where
        B: Into<RawBody>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let body = body.into();
        let etag = fingerprint(body.as_bytes());
        let headers = HeaderPipeline::standard(options.cache).normalize(headers);

        let state = if options.gzip {
            CompressionState::pending()
        } else {
            CompressionState::Resolved(None)
        };
        let (ready_tx, _) = watch::channel(!options.gzip);

        let artifact = Arc::new(Self {
            body,
            etag,
            headers,
            gzip_enabled: options.gzip,
            state: Mutex::new(state),
            ready_tx,
        });

        tracing::debug!(
            etag = %artifact.etag,
            size = artifact.body.len(),
            headers = artifact.headers.len(),
            gzip = options.gzip,
            "Artifact prepared"
        );

        if options.gzip {
            artifact.schedule_compression();
        }
        artifact
    }

    /// Prepare a body of dynamic type, such as one read from configuration.
    pub fn from_value<I, K, V>(
        value: toml::Value,
        headers: I,
        options: PrepareOptions,
    ) -> Result<Arc<Self>, PrepareError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let body = RawBody::try_from(value)?;
        Ok(Self::with_options(body, headers, options))
    }

    /// Prepare the contents of a file.
    pub fn from_file<I, K, V>(
        path: &Path,
        headers: I,
        options: PrepareOptions,
    ) -> Result<Arc<Self>, PrepareError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let bytes = std::fs::read(path).map_err(|source| PrepareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_options(bytes, headers, options))
    }

    /// The uncompressed body.
    pub fn body(&self) -> &RawBody {
        &self.body
    }

    /// The gzip form, once compression has resolved and only if it is smaller.
    pub fn gzipped_body(&self) -> Option<Bytes> {
        match &*self.lock_state() {
            CompressionState::Resolved(gzipped) => gzipped.clone(),
            CompressionState::Pending(_) => None,
        }
    }

    /// Hex MD5 of the body, sent as the `ETag`.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Normalized headers in emission order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Whether a gzip form is produced at all.
    pub fn gzip_enabled(&self) -> bool {
        self.gzip_enabled
    }

    /// Whether background compression has resolved.
    pub fn is_ready(&self) -> bool {
        self.lock_state().is_resolved()
    }

    /// Wait until background compression has resolved.
    pub async fn ready(&self) {
        let mut rx = self.ready_tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Queue `call` (wrapped by `defer`) if compression is pending, otherwise
    /// hand it back with the resolved gzip form. The check and the enqueue
    /// happen under one lock, so a deferred call is never missed by `resolve`.
    pub(crate) fn readiness<T, F>(&self, call: T, defer: F) -> Readiness<T>
    where
        F: FnOnce(T) -> PendingRequest,
    {
        let mut state = self.lock_state();
        match &mut *state {
            CompressionState::Pending(queue) => {
                queue.push_back(defer(call));
                Readiness::Deferred
            }
            CompressionState::Resolved(gzipped) => Readiness::Ready(gzipped.clone(), call),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CompressionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn schedule_compression(self: &Arc<Self>) {
        let raw = self.body.to_bytes();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let artifact = Arc::clone(self);
                handle.spawn(async move {
                    let outcome = match tokio::task::spawn_blocking(move || gzip(&raw)).await {
                        Ok(outcome) => outcome,
                        Err(e) => Err(io::Error::other(format!(
                            "gzip task did not complete: {}",
                            e
                        ))),
                    };
                    artifact.finish_compression(outcome);
                });
            }
            Err(_) => {
                tracing::debug!(etag = %self.etag, "No runtime available, compressing inline");
                self.finish_compression(gzip(&raw));
            }
        }
    }

    /// Apply the size policy to a compression outcome and resolve.
    ///
    /// A failure is logged and leaves the artifact without a gzip form; queued
    /// serve calls are replayed either way.
    pub(crate) fn finish_compression(&self, outcome: io::Result<Vec<u8>>) {
        let gzipped = match outcome {
            Ok(compressed) => keep_if_smaller(self.body.len(), compressed),
            Err(e) => {
                tracing::error!(etag = %self.etag, error = %e, "Gzip compression failed");
                None
            }
        };
        self.resolve(gzipped);
    }

    /// Record the compression result and replay queued serve calls in order.
    fn resolve(&self, gzipped: Option<Bytes>) {
        let compressed_size = gzipped.as_ref().map(Bytes::len);
        let waiting = self.lock_state().resolve(gzipped);

        tracing::debug!(
            etag = %self.etag,
            raw_size = self.body.len(),
            compressed_size = ?compressed_size,
            replayed = waiting.len(),
            "Compression resolved"
        );

        for replay in waiting {
            replay();
        }
        // Waiters on `ready()` observe the queue already drained.
        self.ready_tx.send_replace(true);
    }
}

impl std::fmt::Debug for PreparedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedResponse")
            .field("etag", &self.etag)
            .field("size", &self.body.len())
            .field("headers", &self.headers)
            .field("state", &*self.lock_state())
            .finish()
    }
}
