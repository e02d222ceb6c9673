//! Line reader
//!
//! Reads one CR, LF or CRLF terminated line from a buffered stream, with a
//! bound on how many data bytes a single call may consume.

use std::io::{self, BufRead};

use crate::error::Result;

/// How a line read ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// A terminator was seen and consumed
    Terminated,
    /// The bound was reached first; the rest of the line is still in the stream
    Truncated,
    /// The stream closed after some data but before a terminator
    Eof,
}

/// One line, terminator excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub bytes: Vec<u8>,
    pub ending: LineEnding,
}

impl Line {
    pub fn terminated_normally(&self) -> bool {
        self.ending == LineEnding::Terminated
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Text of the line, lossily decoded
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Read one line of at most `max_len - 2` data bytes
///
/// Returns `Ok(None)` when the stream is closed before any byte is read,
/// which is distinct from an empty terminated line. A `\r` ends the line and
/// swallows an immediately following `\n`; a bare `\n` also ends it.
///
/// When the bound is hit, the accumulated bytes come back as
/// [`LineEnding::Truncated`] and nothing past them is read, terminator
/// included. A line that fits the bound exactly therefore reads as a
/// truncated line followed by an empty terminated one.
pub fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<Line>> {
    let limit = max_len.saturating_sub(2);
    let mut bytes = Vec::new();

    loop {
        let remaining = limit - bytes.len();
        if remaining == 0 {
            return Ok(Some(Line {
                bytes,
                ending: LineEnding::Truncated,
            }));
        }

        let buf = fill_buf(reader)?;
        if buf.is_empty() {
            if bytes.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Line {
                bytes,
                ending: LineEnding::Eof,
            }));
        }

        let window = &buf[..buf.len().min(remaining)];
        match window.iter().position(|&b| b == b'\r' || b == b'\n') {
            Some(pos) => {
                bytes.extend_from_slice(&window[..pos]);
                reader.consume(pos);
                consume_terminator(reader)?;
                return Ok(Some(Line {
                    bytes,
                    ending: LineEnding::Terminated,
                }));
            }
            None => {
                let taken = window.len();
                bytes.extend_from_slice(window);
                reader.consume(taken);
            }
        }
    }
}

/// Consume `\n`, `\r` or `\r\n` if one is next; report whether it did
fn consume_terminator<R: BufRead>(reader: &mut R) -> Result<bool> {
    match peek_byte(reader)? {
        Some(b'\n') => {
            reader.consume(1);
            Ok(true)
        }
        Some(b'\r') => {
            reader.consume(1);
            if peek_byte(reader)? == Some(b'\n') {
                reader.consume(1);
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn peek_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>> {
    Ok(fill_buf(reader)?.first().copied())
}

fn fill_buf<R: BufRead>(reader: &mut R) -> Result<&[u8]> {
    loop {
        match reader.fill_buf() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(reader.fill_buf()?)
}
