//! Method dispatcher
//!
//! Turns a request line into exactly one response on the connection.

use std::io::Write;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::ListStore;
use super::pages::{GuestbookPage, PageOutcome, PageRegistry};
use super::request::{Method, RequestLine};
use super::response::{self, StatusCode};
use super::static_files::StaticFiles;

/// Routes requests to dynamic pages or static files
pub struct Dispatcher {
    pages: PageRegistry,
    static_files: StaticFiles,
}

impl Dispatcher {
    pub fn new(pages: PageRegistry, static_files: StaticFiles) -> Self {
        Self {
            pages,
            static_files,
        }
    }

    /// Standard setup: the guestbook page over `store`, static files from the document root
    pub fn from_config(config: &Config, store: Arc<dyn ListStore>) -> Self {
        let mut pages = PageRegistry::new();
        pages.register(GuestbookPage::new(
            &config.guestbook_template,
            store,
            config.max_header_len,
        ));
        let static_files = StaticFiles::new(&config.document_root, config.max_header_len);
        Self::new(pages, static_files)
    }

    /// Parse `request_line` and write the response for it
    ///
    /// Returns the status that was written. Errors mean the connection is
    /// no longer usable and may hold a partial response.
    pub fn dispatch<W: Write>(&self, request_line: &str, out: &mut W) -> Result<StatusCode> {
        let request = match RequestLine::parse(request_line) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("{}", e);
                return self.reject(out);
            }
        };
        tracing::debug!("{} {}", request.method, request.path);

        match request.method {
            Method::Get => self.handle_get(&request.path, out),
            Method::Post => self.handle_post(&request.path, out),
            Method::Other(ref method) => {
                tracing::debug!("Unimplemented method {}", method);
                self.reject(out)
            }
        }
    }

    /// Answer with the fixed 400 document
    pub fn reject<W: Write + ?Sized>(&self, out: &mut W) -> Result<StatusCode> {
        response::write_bad_request(out)?;
        Ok(StatusCode::BadRequest)
    }

    fn handle_get<W: Write>(&self, path: &str, out: &mut W) -> Result<StatusCode> {
        let outcome = self.pages.route(path, out);
        let result = match outcome {
            Ok(PageOutcome::Handled { page, status }) => {
                tracing::debug!("{} served by page {}", path, page);
                Ok(status)
            }
            Ok(PageOutcome::NotFound) => self.static_files.serve(path, out),
            Err(e) => Err(e),
        };

        match result {
            Err(e) if e.is_pre_response() => {
                tracing::error!("Cannot answer GET {}: {}", path, e);
                response::write_internal_error(out)?;
                Ok(StatusCode::InternalServerError)
            }
            other => other,
        }
    }

    /// Nothing accepts uploads yet; acknowledge with an empty response
    fn handle_post<W: Write>(&self, path: &str, out: &mut W) -> Result<StatusCode> {
        tracing::debug!("POST {} accepted without effect", path);
        response::write_empty_response(out, StatusCode::NoContent)?;
        Ok(StatusCode::NoContent)
    }
}
