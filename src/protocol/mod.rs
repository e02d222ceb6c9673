//! Protocol Module
//!
//! Wire protocol spoken to the backing list store (a Redis-style array
//! protocol). Only the ranged list fetch is produced.
//!
//! ## Request Format
//! An array of bulk strings, each length prefixed in ASCII decimal:
//! ```text
//! *4\r\n $6\r\nLRANGE\r\n $<len>\r\n<key>\r\n $<len>\r\n<start>\r\n $<len>\r\n<end>\r\n
//! ```
//! (spaces for clarity only)
//!
//! ## Reply Format
//! ```text
//! *<count>\r\n  followed by <count> elements:
//!   $<len>\r\n<bytes>\r\n   bulk string
//!   :<value>\r\n            integer
//!   -<len>\r\n<bytes>\r\n   error (framed as a bulk string)
//! ```

mod command;
mod response;
mod codec;
mod client;

pub use command::{Command, CommandType};
pub use response::{ArrayElement, ArrayReply, ElementType};
pub use codec::{encode_command, decode_reply, read_reply, write_command, MAX_BULK_LEN};
pub use client::{ArrayClient, ListStore, StoreHandle};
