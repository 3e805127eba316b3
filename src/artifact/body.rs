//! Raw body input.
//!
//! Statically typed callers hand over text or bytes and never fail. Bodies
//! read from configuration arrive as `toml::Value` and are checked here.

use bytes::Bytes;

use super::prepared::PrepareError;

/// The uncompressed bytes of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(Bytes);

impl RawBody {
    /// Borrow the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Cheap clone of the underlying buffer.
    pub fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Bytes> for RawBody {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for RawBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for RawBody {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

impl From<String> for RawBody {
    fn from(text: String) -> Self {
        Self(Bytes::from(text))
    }
}

impl From<&str> for RawBody {
    fn from(text: &str) -> Self {
        Self(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl TryFrom<toml::Value> for RawBody {
    type Error = PrepareError;

    /// Strings become their UTF-8 bytes, arrays must hold integers in `0..=255`.
    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::String(text) => Ok(Self::from(text)),
            toml::Value::Array(items) => {
                let mut bytes = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        toml::Value::Integer(n) => {
                            let byte = u8::try_from(n).map_err(|_| PrepareError::InvalidBodyType {
                                found: format!("array containing out-of-range integer {}", n),
                            })?;
                            bytes.push(byte);
                        }
                        other => {
                            return Err(PrepareError::InvalidBodyType {
                                found: format!("array containing {}", other.type_str()),
                            })
                        }
                    }
                }
                Ok(Self::from(bytes))
            }
            other => Err(PrepareError::InvalidBodyType {
                found: other.type_str().to_string(),
            }),
        }
    }
}
