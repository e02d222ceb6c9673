//! Static file serving
//!
//! Resolves URL paths under the document root, checks that the target is a
//! regular file inside the root, and streams it after a 200 header.
//!
//! ## Size between stat and send
//! `Content-Length` is taken from the open file handle and only that many
//! bytes are copied. A file that grows is cut at the declared length. A
//! file that shrinks after the header went out cannot be repaired: the
//! send ends short and the call fails with [`ZeroError::ShortBody`], which
//! closes the connection.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ZeroError};
use super::mime;
use super::response::{self, HeaderBuilder, StatusCode};

/// File served for paths ending in `/`
pub const INDEX_FILE: &str = "index.html";

/// A static file ready to be served
#[derive(Debug, Clone)]
pub struct StaticResource {
    /// Target as resolved from the URL (echoed in `Location`)
    pub path: PathBuf,
    /// Canonical location on disk
    pub canonical: PathBuf,
    pub content_type: &'static str,
}

/// Map a URL path to its filesystem target under `root`
///
/// `/dir/` becomes `<root>/dir/index.html`, anything else `<root>/<path>`.
/// No normalization happens here; containment is checked on lookup.
pub fn resolve_target(root: &Path, url_path: &str) -> PathBuf {
    let relative = url_path.trim_start_matches('/');
    let target = root.join(relative);
    if url_path.ends_with('/') {
        target.join(INDEX_FILE)
    } else {
        target
    }
}

/// Static file responder bound to one document root
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    max_header_len: usize,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, max_header_len: usize) -> Self {
        Self {
            root: root.into(),
            max_header_len,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the regular file a URL path names, if any
    ///
    /// Missing targets, targets escaping the root (through `..` or symlinks)
    /// and anything that is not a regular file all come back as `None`.
    pub fn lookup(&self, url_path: &str) -> Option<StaticResource> {
        let path = resolve_target(&self.root, url_path);

        let root = match self.root.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Document root {} inaccessible: {}", self.root.display(), e);
                return None;
            }
        };

        let canonical = match path.canonicalize() {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::debug!("Cannot resolve {}: {}", path.display(), e);
                return None;
            }
        };

        if !canonical.starts_with(&root) {
            tracing::warn!(
                "Path traversal attempt blocked: {} -> {}",
                url_path,
                canonical.display()
            );
            return None;
        }

        match fs::metadata(&canonical) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                tracing::debug!("{} is not a regular file", canonical.display());
                return None;
            }
            Err(e) => {
                tracing::debug!("Cannot stat {}: {}", canonical.display(), e);
                return None;
            }
        }

        Some(StaticResource {
            content_type: mime::content_type_for(&path),
            path,
            canonical,
        })
    }

    /// Serve `url_path`, writing either the file or a 404
    ///
    /// A [`ZeroError::Capacity`] means the header did not fit and nothing has
    /// been written yet.
    pub fn serve<W: Write + ?Sized>(&self, url_path: &str, out: &mut W) -> Result<StatusCode> {
        let Some(resource) = self.lookup(url_path) else {
            tracing::warn!(
                "404 not found: {}",
                resolve_target(&self.root, url_path).display()
            );
            response::write_not_found(out)?;
            return Ok(StatusCode::NotFound);
        };

        let file = match File::open(&resource.canonical) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Removed since lookup
                response::write_not_found(out)?;
                return Ok(StatusCode::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        // Stat the handle we send from, not the path
        let meta = file.metadata()?;
        if !meta.is_file() {
            response::write_not_found(out)?;
            return Ok(StatusCode::NotFound);
        }
        let len = meta.len();

        let head = HeaderBuilder::new(StatusCode::Ok, self.max_header_len)?
            .header("Content-Type", resource.content_type)?
            .header("Content-Length", len)?
            .header("Location", resource.path.display())?
            .finish()?;

        out.write_all(&head)?;
        let sent = io::copy(&mut file.take(len), out)?;
        out.flush()?;

        if sent < len {
            return Err(ZeroError::ShortBody {
                expected: len,
                sent,
            });
        }

        tracing::debug!(
            "200 {} ({} bytes, {})",
            resource.path.display(),
            len,
            resource.content_type
        );
        Ok(StatusCode::Ok)
    }
}
