//! Content fingerprint used as the entity tag.

use md5::{Digest, Md5};

/// Lowercase hex MD5 digest of `body` (32 characters).
pub fn fingerprint(body: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(fingerprint(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(fingerprint(b"alert(\"foo\");"), "af5c77b360ffe88dbed4b3d71e3d0eba");
    }

    #[test]
    fn test_stable_across_calls() {
        let body = "<html>".repeat(100);
        assert_eq!(fingerprint(body.as_bytes()), fingerprint(body.as_bytes()));
        assert_eq!(fingerprint(body.as_bytes()).len(), 32);
        assert_ne!(fingerprint(b"a"), fingerprint(b"b"));
    }
}
