//! Server statistics
//!
//! Counters updated per connection and reported when the server stops.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::http::StatusCode;

#[derive(Debug, Default)]
pub struct ServerStats {
    connections: AtomicU64,
    success: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
    failures: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub connections: u64,
    pub success: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    /// Connections that ended in an I/O or protocol fault
    pub failures: u64,
}

impl ServerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_connection(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_response(&self, status: StatusCode) {
        let counter = if status.is_success() {
            &self.success
        } else if status.is_client_error() {
            &self.client_errors
        } else {
            &self.server_errors
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections: self.connections.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "connections={} 2xx={} 4xx={} 5xx={} failed={}",
            self.connections, self.success, self.client_errors, self.server_errors, self.failures
        )
    }
}
