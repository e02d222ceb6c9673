//! TCP Server
//!
//! Accepts connections and serves them, either inline or on a worker pool.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel;

use crate::config::{AcceptStrategy, Config};
use crate::error::{Result, ZeroError};
use crate::http::Dispatcher;
use crate::protocol::StoreHandle;
use super::{Connection, ServerStats, Shutdown};

/// How long the accept loop sleeps when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accepted sockets queued per worker before the acceptor blocks
const QUEUE_PER_WORKER: usize = 4;

/// TCP server for zerohttpd
pub struct Server {
    config: Config,
    dispatcher: Arc<Dispatcher>,
    listener: Option<TcpListener>,
    shutdown: Shutdown,
    stats: Arc<ServerStats>,
}

impl Server {
    /// Create a new server with the given config and dispatcher
    pub fn new(config: Config, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            listener: None,
            shutdown: Shutdown::new(),
            stats: Arc::new(ServerStats::new()),
        }
    }

    /// Standard wiring: a store handle on `store_addr` feeding the guestbook
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(StoreHandle::new(
            config.store_addr.clone(),
            config.read_timeout(),
            config.write_timeout(),
        ));
        if let Err(e) = store.connect() {
            tracing::warn!(
                "Store at {} not reachable yet, will retry per request: {}",
                store.addr(),
                e
            );
        }
        let dispatcher = Arc::new(Dispatcher::from_config(&config, store));
        Ok(Self::new(config, dispatcher))
    }

    /// Bind the listening socket; returns the bound address
    pub fn bind(&mut self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            ZeroError::Config(format!("cannot listen on {}: {}", self.config.listen_addr, e))
        })?;
        let addr = listener.local_addr()?;
        tracing::info!("zerohttpd listening on {}", addr);
        self.listener = Some(listener);
        Ok(addr)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Token that stops the accept loop when tripped
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn stats(&self) -> Arc<ServerStats> {
        Arc::clone(&self.stats)
    }

    /// Start the server (blocking until shutdown is requested)
    pub fn run(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| ZeroError::Config("server is not bound".to_string()))?;

        // Non-blocking so the shutdown token is seen while idle
        listener.set_nonblocking(true)?;

        let result = match self.config.accept_strategy {
            AcceptStrategy::Iterative => self.accept_loop(listener, |stream| {
                serve_stream(stream, &self.dispatcher, &self.config, &self.stats)
            }),
            AcceptStrategy::WorkerPool { workers } => self.run_pool(listener, workers),
        };

        tracing::info!("Server stopped: {}", self.stats.snapshot());
        result
    }

    fn run_pool(&self, listener: &TcpListener, workers: usize) -> Result<()> {
        let (tx, rx) = channel::bounded::<TcpStream>(workers * QUEUE_PER_WORKER);

        let handles = (0..workers)
            .map(|id| {
                let rx = rx.clone();
                let dispatcher = Arc::clone(&self.dispatcher);
                let config = self.config.clone();
                let stats = Arc::clone(&self.stats);
                thread::Builder::new()
                    .name(format!("zerohttpd-worker-{}", id))
                    .spawn(move || {
                        for stream in rx.iter() {
                            serve_stream(stream, &dispatcher, &config, &stats);
                        }
                    })
            })
            .collect::<io::Result<Vec<_>>>()?;
        drop(rx);
        tracing::info!("Started {} workers", workers);

        let result = self.accept_loop(listener, |stream| {
            if tx.send(stream).is_err() {
                tracing::error!("All workers exited; dropping connection");
            }
        });

        // Closing the channel lets workers finish queued connections and exit
        drop(tx);
        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }
        result
    }

    fn accept_loop<F: FnMut(TcpStream)>(&self, listener: &TcpListener, mut handle: F) -> Result<()> {
        loop {
            if self.shutdown.is_requested() {
                tracing::info!("Shutdown requested, no longer accepting");
                return Ok(());
            }

            match listener.accept() {
                Ok((stream, peer)) => {
                    tracing::trace!("Accepted connection from {}", peer);
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Cannot configure socket for {}: {}", peer, e);
                        continue;
                    }
                    handle(stream);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    // Typically descriptor exhaustion; back off and keep serving
                    tracing::error!("accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }
    }
}

/// Serve one accepted socket to completion and record the outcome
fn serve_stream(stream: TcpStream, dispatcher: &Dispatcher, config: &Config, stats: &ServerStats) {
    stats.record_connection();

    let mut conn = match Connection::new(stream) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!("Cannot set up connection: {}", e);
            stats.record_failure();
            return;
        }
    };

    if let Err(e) = conn.set_timeouts(config.read_timeout(), config.write_timeout()) {
        tracing::warn!("Cannot set timeouts for {}: {}", conn.peer_addr(), e);
    }

    match conn.handle(dispatcher, config.max_line_len) {
        Ok(Some(status)) => {
            tracing::info!("{} {}", conn.peer_addr(), status.as_u16());
            stats.record_response(status);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Connection error from {}: {}", conn.peer_addr(), e);
            stats.record_failure();
        }
    }
}
