//! Response headers and fixed documents
//!
//! Headers are composed in a [`HeaderBuilder`] that refuses to grow past a
//! configured limit and reports [`ZeroError::Capacity`] instead.

use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, ZeroError};

pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Value of the `Server` header
pub const SERVER_BANNER: &str = "zerohttpd/1";

/// Header limit for the fixed error documents, which are known to fit
const FIXED_HEADER_LIMIT: usize = 512;

pub const NOT_FOUND_BODY: &str = "<html>\
<head><title>zerohttpd: not found</title></head>\
<body>\
<h1>Not Found (404)</h1>\
<p>Your client is asking for an object that was not found on this server.</p>\
</body>\
</html>";

pub const BAD_REQUEST_BODY: &str = "<html>\
<head><title>zerohttpd: unimplemented</title></head>\
<body>\
<h1>Bad Request (unimplemented)</h1>\
<p>Your client sent a request zerohttpd did not understand and it is probably not your fault.</p>\
</body>\
</html>";

pub const INTERNAL_ERROR_BODY: &str = "<html>\
<head><title>zerohttpd: internal error</title></head>\
<body>\
<h1>Internal Server Error (500)</h1>\
<p>The server could not build a response for this request.</p>\
</body>\
</html>";

/// Status codes this server emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    NoContent,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    pub fn is_server_error(&self) -> bool {
        self.as_u16() >= 500
    }
}

/// Bounded builder for a status line plus headers
///
/// ```
/// use zerohttpd::http::response::{HeaderBuilder, StatusCode};
///
/// let head = HeaderBuilder::new(StatusCode::Ok, 128)
///     .and_then(|b| b.header("Content-Length", 10))
///     .and_then(|b| b.finish())
///     .unwrap();
/// assert!(head.starts_with(b"HTTP/1.0 200 OK\r\n"));
/// assert!(head.ends_with(b"Content-Length: 10\r\n\r\n"));
/// ```
#[derive(Debug)]
pub struct HeaderBuilder {
    buf: BytesMut,
    limit: usize,
}

impl HeaderBuilder {
    /// Start a header with its status line and `Server` banner
    pub fn new(status: StatusCode, limit: usize) -> Result<Self> {
        let mut builder = Self {
            buf: BytesMut::with_capacity(limit.min(1024)),
            limit,
        };
        builder.push_line(&format!(
            "{} {} {}",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        ))?;
        builder.header("Server", SERVER_BANNER)
    }

    /// Append `name: value`
    pub fn header(mut self, name: &str, value: impl std::fmt::Display) -> Result<Self> {
        self.push_line(&format!("{}: {}", name, value))?;
        Ok(self)
    }

    /// Terminate the header block with the blank line
    pub fn finish(mut self) -> Result<Bytes> {
        self.push_line("")?;
        Ok(self.buf.freeze())
    }

    fn push_line(&mut self, line: &str) -> Result<()> {
        if self.buf.len() + line.len() + 2 > self.limit {
            return Err(ZeroError::Capacity {
                what: "response header",
                limit: self.limit,
            });
        }
        self.buf.put_slice(line.as_bytes());
        self.buf.put_slice(b"\r\n");
        Ok(())
    }
}

/// Write a complete `text/html` response with a fixed body
pub fn write_html_response<W: Write + ?Sized>(
    out: &mut W,
    status: StatusCode,
    body: &str,
) -> Result<()> {
    let head = HeaderBuilder::new(status, FIXED_HEADER_LIMIT)?
        .header("Content-Type", "text/html")?
        .header("Content-Length", body.len())?
        .finish()?;
    out.write_all(&head)?;
    out.write_all(body.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Write a header-only response
pub fn write_empty_response<W: Write + ?Sized>(out: &mut W, status: StatusCode) -> Result<()> {
    let head = HeaderBuilder::new(status, FIXED_HEADER_LIMIT)?
        .header("Content-Length", 0)?
        .finish()?;
    out.write_all(&head)?;
    out.flush()?;
    Ok(())
}

pub fn write_not_found<W: Write + ?Sized>(out: &mut W) -> Result<()> {
    write_html_response(out, StatusCode::NotFound, NOT_FOUND_BODY)
}

pub fn write_bad_request<W: Write + ?Sized>(out: &mut W) -> Result<()> {
    write_html_response(out, StatusCode::BadRequest, BAD_REQUEST_BODY)
}

pub fn write_internal_error<W: Write + ?Sized>(out: &mut W) -> Result<()> {
    write_html_response(out, StatusCode::InternalServerError, INTERNAL_ERROR_BODY)
}
