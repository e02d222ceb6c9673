//! Connection Handler
//!
//! Handles one client connection: one request, one response, then close.

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{Result, ZeroError};
use crate::http::{read_line, Dispatcher, LineEnding, StatusCode};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for line reads)
    reader: BufReader<TcpStream>,

    /// Unbuffered writer so file bodies can go straight to the socket
    writer: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: stream,
            peer_addr,
        })
    }

    /// Configure connection deadlines (`None` blocks forever)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.set_write_timeout(write)?;
        Ok(())
    }

    /// Serve the request on this connection
    ///
    /// Returns the status written, or `None` if the client sent nothing.
    /// Disconnects and timeouts on the client side are not errors.
    pub fn handle(&mut self, dispatcher: &Dispatcher, max_line_len: usize) -> Result<Option<StatusCode>> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        match serve_request(&mut self.reader, &mut self.writer, dispatcher, max_line_len) {
            Ok(status) => Ok(status),
            Err(ZeroError::Io(ref e)) if is_disconnect(e) => {
                tracing::debug!("Client {} went away: {}", self.peer_addr, e);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Error serving {}: {}", self.peer_addr, e);
                Err(e)
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Read one request from `reader` and answer it on `writer`
///
/// The first line is the request line; following lines are read up to the
/// blank line (or end of input) and not interpreted. A request line longer
/// than `max_len - 2` bytes is rejected with 400. One that fills the bound
/// exactly is accepted once its terminator is seen.
pub fn serve_request<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    dispatcher: &Dispatcher,
    max_line_len: usize,
) -> Result<Option<StatusCode>> {
    let Some(mut first) = read_line(reader, max_line_len)? else {
        tracing::debug!("Client closed before sending a request");
        return Ok(None);
    };
    tracing::debug!("line 0 is: {}", first.to_text());

    match first.ending {
        // A blank request line already ends the request
        LineEnding::Terminated if first.is_empty() => {}
        LineEnding::Terminated => drain_header_lines(reader, max_line_len)?,
        LineEnding::Eof => {}
        LineEnding::Truncated => {
            if ends_at_terminator(reader, max_line_len)? {
                first.ending = LineEnding::Terminated;
            }
            drain_header_lines(reader, max_line_len)?;
        }
    }

    if first.ending == LineEnding::Truncated {
        let fault = ZeroError::Capacity {
            what: "request line",
            limit: max_line_len,
        };
        tracing::warn!("Rejecting request: {}", fault);
        return dispatcher.reject(writer).map(Some);
    }

    match std::str::from_utf8(&first.bytes) {
        Ok(request_line) => dispatcher.dispatch(request_line, writer).map(Some),
        Err(_) => {
            tracing::debug!("Request line is not UTF-8");
            dispatcher.reject(writer).map(Some)
        }
    }
}

/// After a truncated line: true if only its terminator (or end of input)
/// was left unread
///
/// Otherwise the rest of the oversized line is consumed.
fn ends_at_terminator<R: BufRead>(reader: &mut R, max_line_len: usize) -> Result<bool> {
    let mut exact = true;
    while let Some(rest) = read_line(reader, max_line_len)? {
        if !rest.is_empty() {
            exact = false;
        }
        if rest.ending != LineEnding::Truncated {
            break;
        }
    }
    Ok(exact)
}

fn drain_header_lines<R: BufRead>(reader: &mut R, max_line_len: usize) -> Result<()> {
    let mut index = 1usize;
    let mut continues_line = false;
    while let Some(line) = read_line(reader, max_line_len)? {
        // An empty read right after a truncated chunk is that line's terminator
        if line.is_empty() && line.terminated_normally() && !continues_line {
            break;
        }
        tracing::trace!("line {} is: {}", index, line.to_text());
        match line.ending {
            LineEnding::Eof => break,
            LineEnding::Truncated => continues_line = true,
            LineEnding::Terminated => {
                continues_line = false;
                index += 1;
            }
        }
    }
    Ok(())
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
