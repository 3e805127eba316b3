//! Header normalization applied once at construction.
//!
//! Each rule looks at a single header (name matched case-insensitively) and
//! may rewrite its value. Names are kept exactly as supplied and headers are
//! emitted in the order they were given.

use super::duration::parse_duration;
use super::mime::resolve_content_type;

/// A normalized response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A single rewrite step in the normalization pipeline.
pub trait HeaderRule: Send + Sync {
    fn apply(&self, header: Header) -> Header;
}

/// Rewrites `Cache-Control` durations into `public, max-age=<secs>`.
///
/// A value such as `"1 year"` is converted directly. Otherwise, when a numeric
/// max-age in seconds was configured, that number is used instead.
#[derive(Debug, Clone, Default)]
pub struct CacheControlRule {
    pub cache_secs: Option<u64>,
}

impl HeaderRule for CacheControlRule {
    fn apply(&self, header: Header) -> Header {
        if !header.is("cache-control") {
            return header;
        }
        let seconds = match parse_duration(&header.value) {
            Some(duration) => duration.as_secs(),
            None => match self.cache_secs {
                Some(secs) => secs,
                None => return header,
            },
        };
        Header {
            value: format!("public, max-age={}", seconds),
            ..header
        }
    }
}

/// Expands extension shorthand in `Content-Type` to a full media type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTypeRule;

impl HeaderRule for ContentTypeRule {
    fn apply(&self, header: Header) -> Header {
        if !header.is("content-type") || header.value.contains('/') {
            return header;
        }
        let value = resolve_content_type(&header.value);
        Header { value, ..header }
    }
}

/// Ordered set of rules run over every supplied header.
pub struct HeaderPipeline {
    rules: Vec<Box<dyn HeaderRule>>,
}

impl HeaderPipeline {
    /// The standard pipeline: cache-control, then content-type.
    pub fn standard(cache_secs: Option<u64>) -> Self {
        Self {
            rules: vec![
                Box::new(CacheControlRule { cache_secs }),
                Box::new(ContentTypeRule),
            ],
        }
    }

    pub fn normalize<I, K, V>(&self, headers: I) -> Vec<Header>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .map(|(name, value)| {
                self.rules
                    .iter()
                    .fold(Header::new(name, value), |header, rule| rule.apply(header))
            })
            .collect()
    }
}
