//! Dynamic pages
//!
//! Pages register with a [`PageRegistry`]; the dispatcher asks the registry
//! first and falls back to static files when no page claims the path.

pub mod guestbook;

use std::io::Write;

use crate::error::Result;
use super::response::StatusCode;

pub use guestbook::GuestbookPage;

/// Result of offering a path to the dynamic pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// No page matched; nothing was written
    NotFound,
    /// A page wrote the full response; the caller must not write again
    Handled { page: &'static str, status: StatusCode },
}

/// A server-generated page
pub trait DynamicPage: Send + Sync {
    /// Identifier used in logs and outcomes
    fn id(&self) -> &'static str;

    /// Exact path this page answers
    fn route(&self) -> &str;

    /// Write headers and body for this page
    fn render(&self, out: &mut dyn Write) -> Result<StatusCode>;

    fn try_handle(&self, path: &str, out: &mut dyn Write) -> Result<PageOutcome> {
        if path != self.route() {
            return Ok(PageOutcome::NotFound);
        }
        let status = self.render(out)?;
        Ok(PageOutcome::Handled {
            page: self.id(),
            status,
        })
    }
}

/// Ordered set of dynamic pages; the first match wins
#[derive(Default)]
pub struct PageRegistry {
    pages: Vec<Box<dyn DynamicPage>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, page: impl DynamicPage + 'static) {
        tracing::debug!("Registered dynamic page {} at {}", page.id(), page.route());
        self.pages.push(Box::new(page));
    }

    /// Offer `path` to each page in registration order
    pub fn route(&self, path: &str, out: &mut dyn Write) -> Result<PageOutcome> {
        for page in &self.pages {
            let outcome = page.try_handle(path, out)?;
            if outcome != PageOutcome::NotFound {
                return Ok(outcome);
            }
        }
        Ok(PageOutcome::NotFound)
    }
}
