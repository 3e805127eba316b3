//! Content-Type shorthand resolution.
//!
//! Values containing `/` are already full media types. Anything else is read
//! as a file extension (`"html"`, `".js"`, `"svg"`) and looked up, first in the
//! table below and then in `mime_guess`.

const DEFAULT_TYPE: &str = "application/octet-stream";

/// Common web types, pinned so that shorthand resolves the same way
/// regardless of the `mime_guess` database version.
const WEB_TYPES: &[(&str, &str)] = &[
    ("htm", "text/html"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("woff", "application/font-woff"),
    ("woff2", "font/woff2"),
    ("wasm", "application/wasm"),
    ("pdf", "application/pdf"),
];

/// Resolve a Content-Type value, expanding extension shorthand.
pub fn resolve_content_type(value: &str) -> String {
    if value.contains('/') {
        return value.to_string();
    }
    lookup_extension(value)
}

fn lookup_extension(token: &str) -> String {
    let ext = token.trim().trim_start_matches('.').to_ascii_lowercase();

    if let Some((_, media_type)) = WEB_TYPES.iter().find(|(e, _)| *e == ext) {
        return (*media_type).to_string();
    }

    mime_guess::from_ext(&ext)
        .first_raw()
        .unwrap_or(DEFAULT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand() {
        assert_eq!(resolve_content_type("html"), "text/html");
        assert_eq!(resolve_content_type("js"), "application/javascript");
        assert_eq!(resolve_content_type(".CSS"), "text/css");
    }

    #[test]
    fn test_full_type_passes_through() {
        assert_eq!(resolve_content_type("text/html; charset=utf-8"), "text/html; charset=utf-8");
        assert_eq!(resolve_content_type("application/x-custom"), "application/x-custom");
    }

    #[test]
    fn test_falls_back_to_mime_guess() {
        assert_eq!(resolve_content_type("mp4"), "video/mp4");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(resolve_content_type("definitely-not-an-ext"), DEFAULT_TYPE);
    }
}
