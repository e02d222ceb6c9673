//! zerohttpd CLI Client
//!
//! Queries the backing store the way the guestbook does.

use clap::{Parser, Subcommand};
use zerohttpd::protocol::{ArrayClient, ArrayElement};

/// zerohttpd store query tool
#[derive(Parser, Debug)]
#[command(name = "zerohttpd-cli")]
#[command(about = "Query the zerohttpd backing store")]
struct Args {
    /// Store address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a range of list elements
    Lrange {
        /// The list key
        key: String,

        /// First index
        #[arg(default_value = "0", allow_hyphen_values = true)]
        start: i64,

        /// Last index (negative counts from the end)
        #[arg(default_value = "-1", allow_hyphen_values = true)]
        end: i64,
    },
}

fn main() {
    let args = Args::parse();

    let mut client = match ArrayClient::connect(&args.server, None, None) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("(error) {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Lrange { key, start, end } => match client.fetch_range(&key, start, end) {
            Ok(reply) if reply.is_empty() => println!("(empty array)"),
            Ok(reply) => {
                for (i, element) in reply.iter().enumerate() {
                    match element {
                        ArrayElement::BulkString(b) => {
                            println!("{}) \"{}\"", i + 1, String::from_utf8_lossy(b))
                        }
                        ArrayElement::Integer(n) => println!("{}) (integer) {}", i + 1, n),
                        ArrayElement::Error(b) => {
                            println!("{}) (error) {}", i + 1, String::from_utf8_lossy(b))
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                std::process::exit(1);
            }
        },
    }
}
