//! MIME type detection
//!
//! Content types come from the extension alone, matched case-sensitively.
//! The extension is whatever follows the last `.` in the whole path, so a
//! dotfile such as `public/.css` counts as `css` and `a.d/README` has the
//! unknown extension `d/README`.

use std::path::Path;

/// Get the Content-Type for a file extension
pub fn content_type_for_extension(extension: Option<&str>) -> &'static str {
    match extension {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("htm" | "html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Text after the last `.` of `path`; none when there is no dot or the
/// path starts with it
pub fn extension_of(path: &str) -> Option<&str> {
    match path.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some(&path[dot + 1..]),
    }
}

/// Get the Content-Type for a file path
pub fn content_type_for(path: &Path) -> &'static str {
    content_type_for_extension(path.to_str().and_then(extension_of))
}
