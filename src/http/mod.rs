//! HTTP Module
//!
//! A small HTTP/1.0 subset: only the request line is interpreted, every
//! connection carries one request and one response.
//!
//! ## Request Flow
//! ```text
//!  read_line ──▶ Dispatcher ──GET──▶ PageRegistry ──NotFound──▶ StaticFiles
//!                    │                    │                         │
//!                    │                 Handled                  200 / 404
//!                    ├──POST──▶ 204
//!                    └──other─▶ 400
//! ```

pub mod line;
pub mod request;
pub mod response;
pub mod mime;
pub mod static_files;
pub mod pages;
pub mod dispatch;

pub use line::{read_line, Line, LineEnding};
pub use request::{Method, RequestLine};
pub use response::StatusCode;
pub use static_files::{resolve_target, StaticFiles, StaticResource};
pub use pages::{DynamicPage, PageOutcome, PageRegistry};
pub use dispatch::Dispatcher;
