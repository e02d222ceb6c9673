//! Protocol codec
//!
//! Encoding of store commands and decoding of array replies.
//!
//! ## Reply Decoder States
//! ```text
//! ArrayMarker ──'*'──▶ ArrayLength ──N──▶ ElementType ──marker──▶ ElementBody
//!                                              ▲                     │
//!                                              └─── remaining > 0 ───┤
//!                                                                    ▼
//!                                                                  Done
//! ```
//!
//! The decoder consumes exactly the bytes each length prefix declares and
//! never returns a partial reply: any malformed byte or early end of stream
//! fails the whole decode.

use std::io::{self, Read, Write};

use bytes::Bytes;

use crate::error::{Result, ZeroError};
use super::{ArrayElement, ArrayReply, Command, ElementType};

const CRLF: &[u8] = b"\r\n";

/// Largest bulk string accepted (the store's own limit is 512 MB)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Cap on up-front allocation for a declared element count
const MAX_PREALLOC_ELEMENTS: usize = 1024;

/// Longest top-level error line read before giving up
const MAX_ERROR_LINE: usize = 4096;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command as an array of bulk strings
///
/// Each bulk string's length prefix is the byte length of its payload, so
/// numeric arguments are prefixed with their decimal digit count.
pub fn encode_command(command: &Command) -> Vec<u8> {
    let name = command.command_type().name().as_bytes();
    let args = command.arguments();

    let payload_len: usize = args.iter().map(|a| a.len() + 16).sum();
    let mut message = Vec::with_capacity(16 + name.len() + payload_len);

    message.push(b'*');
    message.extend_from_slice((args.len() + 1).to_string().as_bytes());
    message.extend_from_slice(CRLF);

    push_bulk_string(&mut message, name);
    for arg in &args {
        push_bulk_string(&mut message, arg);
    }

    message
}

fn push_bulk_string(out: &mut Vec<u8>, payload: &[u8]) {
    out.push(b'$');
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.extend_from_slice(CRLF);
    out.extend_from_slice(payload);
    out.extend_from_slice(CRLF);
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Decoding
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum DecodeState {
    ArrayMarker,
    ArrayLength,
    ElementType { remaining: usize },
    ElementBody { kind: ElementType, remaining: usize },
    Done,
}

/// Decode an array reply held entirely in `bytes`
///
/// Trailing bytes after the declared elements are a protocol error.
pub fn decode_reply(bytes: &[u8]) -> Result<ArrayReply> {
    let mut cursor = bytes;
    let reply = read_reply(&mut cursor)?;

    if !cursor.is_empty() {
        return Err(ZeroError::Protocol(format!(
            "{} unexpected bytes after array reply",
            cursor.len()
        )));
    }
    Ok(reply)
}

/// Read one complete array reply from a stream
///
/// Blocks until the reply is fully decoded or an error occurs.
pub fn read_reply<R: Read>(reader: &mut R) -> Result<ArrayReply> {
    let mut elements = Vec::new();
    let mut state = DecodeState::ArrayMarker;

    loop {
        state = match state {
            DecodeState::ArrayMarker => match read_byte(reader)? {
                b'*' => DecodeState::ArrayLength,
                b'-' => {
                    let message = read_error_line(reader)?;
                    return Err(ZeroError::Protocol(format!(
                        "store replied with error: {}",
                        message
                    )));
                }
                other => {
                    return Err(ZeroError::Protocol(format!(
                        "expected array marker '*', got 0x{:02x}",
                        other
                    )))
                }
            },

            DecodeState::ArrayLength => {
                let count = read_length(reader, "array length")?;
                tracing::trace!("array reply declares {} elements", count);
                elements.reserve(count.min(MAX_PREALLOC_ELEMENTS));
                after_element(count)
            }

            DecodeState::ElementType { remaining } => {
                let marker = read_byte(reader)?;
                let kind = ElementType::from_marker(marker).ok_or_else(|| {
                    ZeroError::Protocol(format!("unknown element marker 0x{:02x}", marker))
                })?;
                DecodeState::ElementBody { kind, remaining }
            }

            DecodeState::ElementBody { kind, remaining } => {
                let element = match kind {
                    ElementType::Integer => ArrayElement::Integer(read_decimal(reader, true)?),
                    ElementType::BulkString => ArrayElement::BulkString(read_bulk_body(reader)?),
                    ElementType::Error => ArrayElement::Error(read_bulk_body(reader)?),
                };
                elements.push(element);
                after_element(remaining - 1)
            }

            DecodeState::Done => return Ok(ArrayReply::new(elements)),
        };
    }
}

fn after_element(remaining: usize) -> DecodeState {
    if remaining == 0 {
        DecodeState::Done
    } else {
        DecodeState::ElementType { remaining }
    }
}

/// Length, CRLF, exactly `length` raw bytes, CRLF
fn read_bulk_body<R: Read>(reader: &mut R) -> Result<Bytes> {
    let len = read_length(reader, "bulk string length")?;
    if len > MAX_BULK_LEN {
        return Err(ZeroError::Protocol(format!(
            "bulk string too large: {} bytes (max {})",
            len, MAX_BULK_LEN
        )));
    }

    // Grow as bytes arrive instead of trusting the declared length up front
    let mut payload = Vec::with_capacity(len.min(64 * 1024));
    reader.by_ref().take(len as u64).read_to_end(&mut payload)?;
    if payload.len() < len {
        return Err(premature_close());
    }

    expect_crlf(reader)?;
    Ok(Bytes::from(payload))
}

fn read_length<R: Read>(reader: &mut R, what: &str) -> Result<usize> {
    let value = read_decimal(reader, false)?;
    usize::try_from(value)
        .map_err(|_| ZeroError::Protocol(format!("{} out of range: {}", what, value)))
}

/// ASCII decimal terminated by CRLF, with an optional sign when `signed`
fn read_decimal<R: Read>(reader: &mut R, signed: bool) -> Result<i64> {
    let mut byte = read_byte(reader)?;
    let mut negative = false;
    if signed && (byte == b'-' || byte == b'+') {
        negative = byte == b'-';
        byte = read_byte(reader)?;
    }

    let mut value: i64 = 0;
    let mut digits = 0usize;
    loop {
        match byte {
            b'0'..=b'9' => {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(i64::from(byte - b'0')))
                    .ok_or_else(|| ZeroError::Protocol("decimal value overflows".to_string()))?;
                digits += 1;
            }
            b'\r' => {
                expect_byte(reader, b'\n')?;
                break;
            }
            other => {
                return Err(ZeroError::Protocol(format!(
                    "expected digit, got 0x{:02x}",
                    other
                )))
            }
        }
        byte = read_byte(reader)?;
    }

    if digits == 0 {
        return Err(ZeroError::Protocol("empty decimal value".to_string()));
    }
    Ok(if negative { -value } else { value })
}

fn read_error_line<R: Read>(reader: &mut R) -> Result<String> {
    let mut line = Vec::new();
    loop {
        match read_byte(reader)? {
            b'\r' => {
                expect_byte(reader, b'\n')?;
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }
            byte => {
                if line.len() >= MAX_ERROR_LINE {
                    return Err(ZeroError::Capacity {
                        what: "store error line",
                        limit: MAX_ERROR_LINE,
                    });
                }
                line.push(byte);
            }
        }
    }
}

fn expect_crlf<R: Read>(reader: &mut R) -> Result<()> {
    expect_byte(reader, b'\r')?;
    expect_byte(reader, b'\n')
}

fn expect_byte<R: Read>(reader: &mut R, expected: u8) -> Result<()> {
    let got = read_byte(reader)?;
    if got != expected {
        return Err(ZeroError::Protocol(format!(
            "expected 0x{:02x}, got 0x{:02x}",
            expected, got
        )));
    }
    Ok(())
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            premature_close()
        } else {
            ZeroError::Io(e)
        }
    })?;
    Ok(byte[0])
}

fn premature_close() -> ZeroError {
    ZeroError::Protocol("stream closed before reply was complete".to_string())
}
