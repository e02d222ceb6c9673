//! Store client
//!
//! Issues range queries over a single connection and blocks for the full
//! reply. There is no pipelining: one request, one reply.

use std::io::{BufReader, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{Result, ZeroError};
use super::{read_reply, write_command, ArrayReply, Command};

/// Request/reply client over one stream
pub struct ArrayClient<S: Read + Write> {
    /// Reads are buffered; writes go straight through `get_mut()`
    reader: BufReader<S>,
}

impl<S: Read + Write> ArrayClient<S> {
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    /// Fetch list elements of `key` from `start` to `end` (inclusive)
    pub fn fetch_range(&mut self, key: &str, start: i64, end: i64) -> Result<ArrayReply> {
        let command = Command::lrange(key, start, end);
        tracing::trace!("sending {:?}", command);

        write_command(self.reader.get_mut(), &command)?;
        let reply = read_reply(&mut self.reader)?;

        tracing::trace!("LRANGE {} {} {} -> {} elements", key, start, end, reply.len());
        Ok(reply)
    }

    /// Get the underlying stream back
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

impl ArrayClient<TcpStream> {
    /// Connect to a store at `addr` (host:port)
    pub fn connect(
        addr: &str,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| ZeroError::Store(format!("connect to {}: {}", addr, e)))?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_write_timeout(write_timeout)?;

        tracing::info!("Connected to store at {}", addr);
        Ok(Self::new(stream))
    }
}

/// Source of list ranges for dynamic pages
pub trait ListStore: Send + Sync {
    fn fetch_range(&self, key: &str, start: i64, end: i64) -> Result<ArrayReply>;
}

/// Shared handle on the single store connection
///
/// Access is serialized: the protocol has no request identifiers, so two
/// callers must never interleave on the same stream. The connection is
/// opened on first use and dropped after any failure, since the stream
/// position is unknown once a reply has gone wrong.
pub struct StoreHandle {
    addr: String,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    client: Mutex<Option<ArrayClient<TcpStream>>>,
}

impl StoreHandle {
    pub fn new(
        addr: impl Into<String>,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Self {
        Self {
            addr: addr.into(),
            read_timeout,
            write_timeout,
            client: Mutex::new(None),
        }
    }

    /// Open the connection now instead of on first query
    pub fn connect(&self) -> Result<()> {
        let mut slot = self.client.lock();
        if slot.is_none() {
            *slot = Some(ArrayClient::connect(
                &self.addr,
                self.read_timeout,
                self.write_timeout,
            )?);
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.client.lock().is_some()
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl ListStore for StoreHandle {
    fn fetch_range(&self, key: &str, start: i64, end: i64) -> Result<ArrayReply> {
        let mut slot = self.client.lock();

        let mut client = match slot.take() {
            Some(client) => client,
            None => ArrayClient::connect(&self.addr, self.read_timeout, self.write_timeout)?,
        };

        match client.fetch_range(key, start, end) {
            Ok(reply) => {
                *slot = Some(client);
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!("Dropping store connection to {}: {}", self.addr, e);
                Err(e)
            }
        }
    }
}
