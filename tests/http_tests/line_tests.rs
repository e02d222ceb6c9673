//! Tests for the line reader

use std::io::{BufReader, Cursor, Read};

use zerohttpd::http::{read_line, LineEnding};

fn cursor(bytes: &[u8]) -> Cursor<Vec<u8>> {
    Cursor::new(bytes.to_vec())
}

// =============================================================================
// Terminators
// =============================================================================

#[test]
fn test_crlf_line_excludes_terminator() {
    let mut input = cursor(b"GET / HTTP/1.0\r\nHost: x\r\n");

    let line = read_line(&mut input, 1024).unwrap().unwrap();
    assert_eq!(line.bytes, b"GET / HTTP/1.0");
    assert!(line.terminated_normally());

    // The terminator is gone: the next read starts at the next line
    let next = read_line(&mut input, 1024).unwrap().unwrap();
    assert_eq!(next.bytes, b"Host: x");
}

#[test]
fn test_crlf_is_one_terminator() {
    let mut input = cursor(b"a\r\nb\r\n");

    assert_eq!(read_line(&mut input, 64).unwrap().unwrap().bytes, b"a");
    assert_eq!(read_line(&mut input, 64).unwrap().unwrap().bytes, b"b");
    assert!(read_line(&mut input, 64).unwrap().is_none());
}

#[test]
fn test_bare_lf_terminates() {
    let mut input = cursor(b"GET /x\n\n");

    let line = read_line(&mut input, 64).unwrap().unwrap();
    assert_eq!(line.bytes, b"GET /x");
    assert!(line.terminated_normally());

    let blank = read_line(&mut input, 64).unwrap().unwrap();
    assert!(blank.is_empty());
    assert!(blank.terminated_normally());
}

#[test]
fn test_cr_lf_split_across_reads() {
    // A one-byte buffer forces the peek for '\n' onto a fresh fill
    let mut input = BufReader::with_capacity(1, cursor(b"ab\r\ncd\r\n"));

    assert_eq!(read_line(&mut input, 64).unwrap().unwrap().bytes, b"ab");
    assert_eq!(read_line(&mut input, 64).unwrap().unwrap().bytes, b"cd");
}

#[test]
fn test_bare_cr_ends_line() {
    let mut input = cursor(b"abc\rdef\n");

    assert_eq!(read_line(&mut input, 64).unwrap().unwrap().bytes, b"abc");
    assert_eq!(read_line(&mut input, 64).unwrap().unwrap().bytes, b"def");
}

#[test]
fn test_cr_at_end_of_stream() {
    let mut input = cursor(b"tail\r");

    let line = read_line(&mut input, 64).unwrap().unwrap();
    assert_eq!(line.bytes, b"tail");
    assert!(line.terminated_normally());
    assert!(read_line(&mut input, 64).unwrap().is_none());
}

// =============================================================================
// End of Input
// =============================================================================

#[test]
fn test_eof_without_data_is_none() {
    let mut input = cursor(b"");
    assert!(read_line(&mut input, 64).unwrap().is_none());
}

#[test]
fn test_empty_line_is_not_eof() {
    let mut input = cursor(b"\r\n");

    let line = read_line(&mut input, 64).unwrap().unwrap();
    assert!(line.is_empty());
    assert_eq!(line.ending, LineEnding::Terminated);
}

#[test]
fn test_eof_after_partial_line() {
    let mut input = cursor(b"GET /half");

    let line = read_line(&mut input, 64).unwrap().unwrap();
    assert_eq!(line.bytes, b"GET /half");
    assert_eq!(line.ending, LineEnding::Eof);
    assert!(read_line(&mut input, 64).unwrap().is_none());
}

// =============================================================================
// Bound
// =============================================================================

#[test]
fn test_truncation_leaves_remainder_in_stream() {
    // max_len 8 allows 6 data bytes
    let mut input = cursor(b"abcdefghij\r\n");

    let line = read_line(&mut input, 8).unwrap().unwrap();
    assert_eq!(line.bytes, b"abcdef");
    assert_eq!(line.ending, LineEnding::Truncated);
    assert!(!line.terminated_normally());

    let rest = read_line(&mut input, 8).unwrap().unwrap();
    assert_eq!(rest.bytes, b"ghij");
    assert!(rest.terminated_normally());
}

#[test]
fn test_line_filling_bound_exactly_stops_before_terminator() {
    let mut input = cursor(b"abcdef\r\nnext\r\n");

    let line = read_line(&mut input, 8).unwrap().unwrap();
    assert_eq!(line.bytes, b"abcdef");
    assert_eq!(line.ending, LineEnding::Truncated);
    assert_eq!(input.position(), 6);

    // The terminator is still in the stream and reads as an empty line
    let blank = read_line(&mut input, 8).unwrap().unwrap();
    assert!(blank.is_empty());
    assert!(blank.terminated_normally());

    assert_eq!(read_line(&mut input, 8).unwrap().unwrap().bytes, b"next");
}

#[test]
fn test_bound_of_two_reads_nothing() {
    let mut input = cursor(b"abc\r\n");

    let line = read_line(&mut input, 2).unwrap().unwrap();
    assert!(line.is_empty());
    assert_eq!(line.ending, LineEnding::Truncated);
    assert_eq!(input.position(), 0);
}

#[test]
fn test_truncation_does_not_over_read() {
    let mut input = cursor(b"0123456789");

    let line = read_line(&mut input, 6).unwrap().unwrap();
    assert_eq!(line.bytes, b"0123");

    let mut rest = Vec::new();
    input.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"456789");
}

#[test]
fn test_binary_bytes_pass_through() {
    let mut input = cursor(b"\x00\xff\x7f\r\n");
    let line = read_line(&mut input, 64).unwrap().unwrap();
    assert_eq!(line.bytes, vec![0x00, 0xff, 0x7f]);
}
