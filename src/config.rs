//! Configuration for zerohttpd
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ZeroError};

/// Default HTTP listening port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default backing store host
pub const DEFAULT_STORE_HOST: &str = "127.0.0.1";

/// Default backing store port
pub const DEFAULT_STORE_PORT: u16 = 6379;

/// Main configuration for a zerohttpd instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address for HTTP clients
    pub listen_addr: String,

    /// Address of the backing list store (host:port)
    pub store_addr: String,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// How accepted connections are scheduled
    pub accept_strategy: AcceptStrategy,

    // -------------------------------------------------------------------------
    // Content Configuration
    // -------------------------------------------------------------------------
    /// Directory static paths are resolved under
    pub document_root: PathBuf,

    /// Template file for the guestbook page
    pub guestbook_template: PathBuf,

    // -------------------------------------------------------------------------
    // Buffer Limits
    // -------------------------------------------------------------------------
    /// Bound passed to the line reader (terminator included)
    pub max_line_len: usize,

    /// Largest response header the server will compose
    pub max_header_len: usize,
}

/// Accept strategy for client connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptStrategy {
    /// Serve each connection to completion before accepting the next
    Iterative,

    /// Hand accepted connections to a fixed set of worker threads
    WorkerPool { workers: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_HTTP_PORT),
            store_addr: format!("{}:{}", DEFAULT_STORE_HOST, DEFAULT_STORE_PORT),
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            accept_strategy: AcceptStrategy::Iterative,
            document_root: PathBuf::from("public"),
            guestbook_template: PathBuf::from("template/guestbook/index.html"),
            max_line_len: 1024,
            max_header_len: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check limits that would make the server unusable
    pub fn validate(&self) -> Result<()> {
        if self.max_line_len < 3 {
            return Err(ZeroError::Config(format!(
                "max_line_len must be at least 3, got {}",
                self.max_line_len
            )));
        }
        if let AcceptStrategy::WorkerPool { workers: 0 } = self.accept_strategy {
            return Err(ZeroError::Config(
                "worker pool needs at least one worker".to_string(),
            ));
        }
        Ok(())
    }

    /// Read deadline, if one is configured
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Write deadline, if one is configured
    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the backing store address
    pub fn store_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.store_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the accept strategy
    pub fn accept_strategy(mut self, strategy: AcceptStrategy) -> Self {
        self.config.accept_strategy = strategy;
        self
    }

    /// Set the static document root
    pub fn document_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.document_root = path.into();
        self
    }

    /// Set the guestbook template path
    pub fn guestbook_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.guestbook_template = path.into();
        self
    }

    /// Set the line reader bound
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    /// Set the response header size limit
    pub fn max_header_len(mut self, len: usize) -> Self {
        self.config.max_header_len = len;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
