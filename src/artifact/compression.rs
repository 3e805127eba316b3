//! Background gzip compression and the one-shot readiness state.
//!
//! # State Transitions
//! ```text
//! Pending(queue) → Resolved(Some(gzip))   compressed form is smaller
//! Pending(queue) → Resolved(None)         not smaller, encoder error, or task failure
//! ```
//!
//! The transition happens exactly once. Requests queued while pending are
//! handed back to the caller of `resolve` in arrival order.

use std::collections::VecDeque;
use std::io::{self, Write};

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;

/// A deferred serve call, replayed once compression resolves.
pub type PendingRequest = Box<dyn FnOnce() + Send + 'static>;

/// Gzip `body` at the default compression level.
pub fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}

/// Keep a compressed form only when it is strictly smaller than the raw body.
pub fn keep_if_smaller(raw_len: usize, compressed: Vec<u8>) -> Option<Bytes> {
    if compressed.len() < raw_len {
        Some(Bytes::from(compressed))
    } else {
        None
    }
}

/// Compression readiness of an artifact.
pub enum CompressionState {
    Pending(VecDeque<PendingRequest>),
    Resolved(Option<Bytes>),
}

impl CompressionState {
    pub fn pending() -> Self {
        CompressionState::Pending(VecDeque::new())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CompressionState::Resolved(_))
    }

    /// Move to `Resolved`, returning whatever was queued.
    ///
    /// Resolving twice keeps the first result and returns an empty queue.
    pub fn resolve(&mut self, gzipped: Option<Bytes>) -> VecDeque<PendingRequest> {
        match self {
            CompressionState::Pending(queue) => {
                let waiting = std::mem::take(queue);
                *self = CompressionState::Resolved(gzipped);
                waiting
            }
            CompressionState::Resolved(_) => VecDeque::new(),
        }
    }
}

impl std::fmt::Debug for CompressionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionState::Pending(queue) => write!(f, "Pending({} queued)", queue.len()),
            CompressionState::Resolved(Some(body)) => {
                write!(f, "Resolved(gzip {} bytes)", body.len())
            }
            CompressionState::Resolved(None) => write!(f, "Resolved(none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_gzip_roundtrip_shrinks_repetitive_text() {
        let body = "<p>hello world</p>\n".repeat(500);
        let compressed = gzip(body.as_bytes()).unwrap();
        assert!(compressed.len() < body.len());

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..]).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_tiny_body_is_not_kept() {
        let body = b"alert(\"foo\");";
        let compressed = gzip(body).unwrap();
        assert!(keep_if_smaller(body.len(), compressed).is_none());
    }

    #[test]
    fn test_equal_size_is_not_kept() {
        assert!(keep_if_smaller(3, vec![1, 2, 3]).is_none());
        assert!(keep_if_smaller(4, vec![1, 2, 3]).is_some());
    }

    #[test]
    fn test_resolve_drains_in_order_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut state = CompressionState::pending();
        if let CompressionState::Pending(queue) = &mut state {
            for i in 0..3 {
                let log = log.clone();
                queue.push_back(Box::new(move || log.lock().unwrap().push(i)));
            }
        }

        let waiting = state.resolve(None);
        assert!(state.is_resolved());
        for replay in waiting {
            replay();
        }
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);

        // second resolution is a no-op
        assert!(state.resolve(Some(Bytes::from_static(b"x"))).is_empty());
        assert!(matches!(state, CompressionState::Resolved(None)));
    }
}
