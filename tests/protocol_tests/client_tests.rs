//! Client Tests
//!
//! Tests for ArrayClient over scripted streams and StoreHandle over loopback TCP.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use zerohttpd::protocol::{encode_command, ArrayClient, ArrayElement, Command, ListStore, StoreHandle};
use zerohttpd::ZeroError;

use crate::MockStream;

fn bulk(text: &str) -> ArrayElement {
    ArrayElement::BulkString(text.as_bytes().to_vec().into())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read one LRANGE command off a fake store connection (9 CRLF lines)
fn read_command(reader: &mut BufReader<TcpStream>) -> Option<Vec<String>> {
    let mut lines = Vec::new();
    for _ in 0..9 {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        lines.push(line.trim_end().to_string());
    }
    Some(lines)
}

/// Fake store: each accepted connection gets the next scripted reply per command
fn spawn_store(scripts: Vec<Vec<&'static [u8]>>) -> (String, thread::JoinHandle<Vec<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for replies in scripts {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            for reply in replies {
                match read_command(&mut reader) {
                    Some(cmd) => seen.push(cmd),
                    None => break,
                }
                writer.write_all(reply).unwrap();
            }
        }
        seen
    });
    (addr, handle)
}

// =============================================================================
// ArrayClient Tests
// =============================================================================

#[test]
fn test_fetch_range_round_trip() {
    let stream = MockStream::new(b"*2\r\n$1\r\n5\r\n$1\r\n9\r\n");
    let mut client = ArrayClient::new(stream);

    let reply = client.fetch_range("visitor_count", 0, -1).unwrap();
    assert_eq!(reply.elements(), &[bulk("5"), bulk("9")]);

    let stream = client.into_inner();
    assert_eq!(
        stream.output,
        encode_command(&Command::lrange("visitor_count", 0, -1))
    );
}

#[test]
fn test_client_reused_for_sequential_queries() {
    let stream = MockStream::new(b"*1\r\n$1\r\na\r\n*0\r\n");
    let mut client = ArrayClient::new(stream);

    assert_eq!(client.fetch_range("one", 0, 0).unwrap().len(), 1);
    assert!(client.fetch_range("two", 0, -1).unwrap().is_empty());

    let mut expected = encode_command(&Command::lrange("one", 0, 0));
    expected.extend(encode_command(&Command::lrange("two", 0, -1)));
    assert_eq!(client.into_inner().output, expected);
}

#[test]
fn test_partial_reply_is_all_or_nothing() {
    let stream = MockStream::new(b"*3\r\n$1\r\na\r\n$1\r\nb\r\n");
    let mut client = ArrayClient::new(stream);

    assert!(matches!(
        client.fetch_range("k", 0, -1),
        Err(ZeroError::Protocol(_))
    ));
}

// =============================================================================
// StoreHandle Tests
// =============================================================================

#[test]
fn test_store_handle_over_tcp() {
    let (addr, server) = spawn_store(vec![vec![
        &b"*2\r\n$1\r\n5\r\n$1\r\n9\r\n"[..],
        &b"*0\r\n"[..],
    ]]);
    let store = StoreHandle::new(addr, None, None);

    let reply = store.fetch_range("visitor_count", 0, -1).unwrap();
    assert_eq!(reply.elements(), &[bulk("5"), bulk("9")]);
    assert!(store.is_connected());

    // Same connection serves the next query
    assert!(store.fetch_range("guestbook_remarks", 0, -1).unwrap().is_empty());
    drop(store);

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[0],
        vec!["*4", "$6", "LRANGE", "$13", "visitor_count", "$1", "0", "$2", "-1"]
    );
    assert_eq!(seen[1][4], "guestbook_remarks");
}

#[test]
fn test_store_handle_reconnects_after_protocol_fault() {
    let (addr, server) = spawn_store(vec![vec![&b"+OK\r\n"[..]], vec![&b"*1\r\n:7\r\n"[..]]]);
    let store = StoreHandle::new(addr, None, None);

    assert!(matches!(
        store.fetch_range("k", 0, -1),
        Err(ZeroError::Protocol(_))
    ));
    assert!(!store.is_connected());

    let reply = store.fetch_range("k", 0, -1).unwrap();
    assert_eq!(reply.elements(), &[ArrayElement::Integer(7)]);
    drop(store);

    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn test_store_handle_unreachable() {
    // Grab a free port, then stop listening on it
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let store = StoreHandle::new(addr, None, None);

    assert!(matches!(store.connect(), Err(ZeroError::Store(_))));
    assert!(matches!(
        store.fetch_range("k", 0, -1),
        Err(ZeroError::Store(_))
    ));
    assert!(!store.is_connected());
}
