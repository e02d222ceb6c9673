//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread polling a non-blocking listener
//! - Connections served inline (iterative) or by a worker pool
//! - Shutdown observed only between connections

mod server;
mod connection;
mod shutdown;
mod stats;

pub use server::Server;
pub use connection::{serve_request, Connection};
pub use shutdown::Shutdown;
pub use stats::{ServerStats, StatsSnapshot};
