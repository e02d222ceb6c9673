//! # zerohttpd
//!
//! A minimal HTTP/1.0 server with:
//! - A bounded line reader for the request line
//! - Static files served from a document root
//! - A guestbook page filled from a Redis-style list store
//! - An array-protocol client for the store
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (iterative or worker pool)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one request per connection
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Method Dispatcher                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ GET
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │Dynamic Pages│ NotFound │Static Files │
//!   │ (guestbook) │ ───────▶ │ (doc root)  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ Store Client│ ── LRANGE ──▶ backing store
//!   │  (Mutex)    │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod http;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, ZeroError};
pub use config::Config;
pub use network::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of zerohttpd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
