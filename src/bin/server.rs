//! zerohttpd Server Binary
//!
//! Starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use zerohttpd::config::{AcceptStrategy, Config, DEFAULT_HTTP_PORT, DEFAULT_STORE_HOST, DEFAULT_STORE_PORT};
use zerohttpd::Server;

/// zerohttpd Server
#[derive(Parser, Debug)]
#[command(name = "zerohttpd")]
#[command(about = "Minimal HTTP/1.0 server with a store-backed guestbook")]
#[command(version)]
struct Args {
    /// HTTP listening port
    #[arg(default_value_t = DEFAULT_HTTP_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Backing store host
    #[arg(default_value = DEFAULT_STORE_HOST)]
    store_host: String,

    /// Backing store port
    #[arg(long, default_value_t = DEFAULT_STORE_PORT)]
    store_port: u16,

    /// Static document root
    #[arg(short, long, default_value = "public")]
    root: String,

    /// Guestbook template file
    #[arg(short, long, default_value = "template/guestbook/index.html")]
    template: String,

    /// Serve connections on this many worker threads instead of one at a time
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Per-connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zerohttpd=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("zerohttpd v{}", zerohttpd::VERSION);

    let accept_strategy = match args.workers {
        Some(workers) => AcceptStrategy::WorkerPool { workers },
        None => AcceptStrategy::Iterative,
    };

    // Build config from args
    let config = Config::builder()
        .listen_addr(format!("0.0.0.0:{}", args.port))
        .store_addr(format!("{}:{}", args.store_host, args.store_port))
        .document_root(&args.root)
        .guestbook_template(&args.template)
        .accept_strategy(accept_strategy)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    tracing::info!("Document root: {}", config.document_root.display());
    tracing::info!("Store address: {}", config.store_addr);

    let mut server = match Server::from_config(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.request();
    }) {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
