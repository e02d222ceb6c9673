//! Tests for reading and answering one request

use std::io::{Cursor, Read};
use std::sync::Arc;

use zerohttpd::config::Config;
use zerohttpd::http::response::BAD_REQUEST_BODY;
use zerohttpd::http::{Dispatcher, StatusCode};
use zerohttpd::network::serve_request;
use zerohttpd::protocol::StoreHandle;

use crate::{root_of, setup_site, split_response, status_line, template_of};

fn dispatcher(site: &tempfile::TempDir) -> Dispatcher {
    let config = Config::builder()
        .document_root(root_of(site.path()))
        .guestbook_template(template_of(site.path()))
        .build();
    // Nothing listens here; the guestbook is not requested in these tests
    let store = Arc::new(StoreHandle::new("127.0.0.1:1", None, None));
    Dispatcher::from_config(&config, store)
}

fn run(dispatcher: &Dispatcher, request: &[u8], max_line_len: usize) -> (Option<StatusCode>, Vec<u8>, Cursor<Vec<u8>>) {
    let mut input = Cursor::new(request.to_vec());
    let mut output = Vec::new();
    let status = serve_request(&mut input, &mut output, dispatcher, max_line_len).unwrap();
    (status, output, input)
}

#[test]
fn test_request_with_headers() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, output, _) = run(
        &dispatcher,
        b"GET /style.css HTTP/1.0\r\nHost: localhost\r\nUser-Agent: test\r\n\r\n",
        1024,
    );

    assert_eq!(status, Some(StatusCode::Ok));
    let (head, body) = split_response(&output);
    assert_eq!(status_line(&head), "HTTP/1.0 200 OK");
    assert_eq!(body, b"0123456789");
}

#[test]
fn test_lf_only_request() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, _, _) = run(&dispatcher, b"GET / HTTP/1.0\nHost: x\n\n", 1024);
    assert_eq!(status, Some(StatusCode::Ok));
}

#[test]
fn test_header_lines_are_drained_up_to_blank_line() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (_, _, mut input) = run(&dispatcher, b"GET / HTTP/1.0\r\nA: 1\r\n\r\nBODY", 1024);

    let mut rest = Vec::new();
    input.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"BODY");
}

#[test]
fn test_request_without_blank_line() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, _, _) = run(&dispatcher, b"GET /style.css HTTP/1.0\r\nHost: x", 1024);
    assert_eq!(status, Some(StatusCode::Ok));
}

#[test]
fn test_request_line_without_terminator() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, _, _) = run(&dispatcher, b"GET /missing.txt", 1024);
    assert_eq!(status, Some(StatusCode::NotFound));
}

#[test]
fn test_silent_client_gets_no_response() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, output, _) = run(&dispatcher, b"", 1024);
    assert_eq!(status, None);
    assert!(output.is_empty());
}

#[test]
fn test_oversized_request_line_is_400() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let long_path = "a".repeat(200);
    let request = format!("GET /{} HTTP/1.0\r\nHost: x\r\n\r\n", long_path);
    let (status, output, mut input) = run(&dispatcher, request.as_bytes(), 64);

    assert_eq!(status, Some(StatusCode::BadRequest));
    let (head, body) = split_response(&output);
    assert_eq!(status_line(&head), "HTTP/1.0 400 Bad Request");
    assert_eq!(body, BAD_REQUEST_BODY.as_bytes());

    // The whole request was consumed
    let mut rest = Vec::new();
    input.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn test_long_header_line_does_not_end_request_early() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let request = format!("GET /style.css HTTP/1.0\r\nCookie: {}\r\n\r\n", "c".repeat(300));
    let (status, _, input) = run(&dispatcher, request.as_bytes(), 64);

    assert_eq!(status, Some(StatusCode::Ok));
    assert_eq!(input.position() as usize, request.len());
}

#[test]
fn test_non_utf8_request_line_is_400() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, _, _) = run(&dispatcher, b"GET /\xff\xfe HTTP/1.0\r\n\r\n", 1024);
    assert_eq!(status, Some(StatusCode::BadRequest));
}

#[test]
fn test_patch_is_400() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, output, _) = run(&dispatcher, b"PATCH /x HTTP/1.0\r\n\r\n", 1024);
    assert_eq!(status, Some(StatusCode::BadRequest));
    let (_, body) = split_response(&output);
    assert_eq!(body, BAD_REQUEST_BODY.as_bytes());
}

#[test]
fn test_request_line_filling_bound_exactly() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    // 62 bytes: exactly the data a 64-byte bound allows
    let request_line = format!("GET /style.css {}", "X".repeat(47));
    assert_eq!(request_line.len(), 62);
    let request = format!("{}\r\nHost: x\r\n\r\n", request_line);

    let (status, output, input) = run(&dispatcher, request.as_bytes(), 64);
    assert_eq!(status, Some(StatusCode::Ok));
    let (_, body) = split_response(&output);
    assert_eq!(body, b"0123456789");
    assert_eq!(input.position() as usize, request.len());
}

#[test]
fn test_request_line_one_past_bound_is_400() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let request = format!("GET /style.css {}\r\n\r\n", "X".repeat(48));
    let (status, _, input) = run(&dispatcher, request.as_bytes(), 64);

    assert_eq!(status, Some(StatusCode::BadRequest));
    assert_eq!(input.position() as usize, request.len());
}

#[test]
fn test_header_line_filling_bound_exactly_is_not_blank_line() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    // Two full 62-byte chunks, then the terminator on its own
    let header = format!("Cookie: {}", "c".repeat(116));
    assert_eq!(header.len(), 124);
    let request = format!("GET /style.css HTTP/1.0\r\n{}\r\nAccept: */*\r\n\r\nBODY", header);

    let (status, _, mut input) = run(&dispatcher, request.as_bytes(), 64);
    assert_eq!(status, Some(StatusCode::Ok));

    let mut rest = Vec::new();
    input.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"BODY");
}

#[test]
fn test_blank_request_line_is_answered_without_reading_on() {
    let site = setup_site();
    let dispatcher = dispatcher(&site);

    let (status, output, input) = run(&dispatcher, b"\r\nGET /style.css HTTP/1.0\r\n\r\n", 1024);

    assert_eq!(status, Some(StatusCode::BadRequest));
    let (_, body) = split_response(&output);
    assert_eq!(body, BAD_REQUEST_BODY.as_bytes());
    // Only the blank line was consumed
    assert_eq!(input.position(), 2);
}
