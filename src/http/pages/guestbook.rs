//! Guestbook page
//!
//! Renders the guestbook template with the visitor count and guest remarks
//! read from the list store. When the store cannot be reached the page is
//! still served, with the count shown as unavailable and no remarks.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, ZeroError};
use crate::http::response::{HeaderBuilder, StatusCode};
use crate::protocol::{ArrayElement, ArrayReply, ListStore};
use super::DynamicPage;

pub const GUESTBOOK_ROUTE: &str = "/guestbook";
pub const VISITOR_KEY: &str = "visitor_count";
pub const REMARKS_KEY: &str = "guestbook_remarks";
pub const VISITOR_TOKEN: &str = "$VISITOR_COUNT$";
pub const REMARKS_TOKEN: &str = "$GUEST_REMARKS$";

/// Shown in place of the count when the store is down
pub const UNAVAILABLE: &str = "unavailable";

/// Values substituted into the template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestbookData {
    /// `None` when the store could not be read
    pub visitor_count: Option<usize>,
    pub remarks: Vec<String>,
}

pub struct GuestbookPage {
    template: PathBuf,
    store: Arc<dyn ListStore>,
    max_header_len: usize,
}

impl GuestbookPage {
    pub fn new(template: impl Into<PathBuf>, store: Arc<dyn ListStore>, max_header_len: usize) -> Self {
        Self {
            template: template.into(),
            store,
            max_header_len,
        }
    }

    /// Read both lists; a store failure degrades to empty data
    pub fn load(&self) -> GuestbookData {
        match self.fetch() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Guestbook rendered without store data: {}", e);
                GuestbookData::default()
            }
        }
    }

    fn fetch(&self) -> Result<GuestbookData> {
        let visitors = self.store.fetch_range(VISITOR_KEY, 0, -1)?;
        let remarks = self.store.fetch_range(REMARKS_KEY, 0, -1)?;
        Ok(GuestbookData {
            visitor_count: Some(visitors.len()),
            remarks: remark_texts(remarks),
        })
    }
}

impl DynamicPage for GuestbookPage {
    fn id(&self) -> &'static str {
        "guestbook"
    }

    fn route(&self) -> &str {
        GUESTBOOK_ROUTE
    }

    fn render(&self, out: &mut dyn Write) -> Result<StatusCode> {
        let template = fs::read_to_string(&self.template).map_err(|e| {
            ZeroError::Template(format!("{}: {}", self.template.display(), e))
        })?;

        let body = render_template(&template, &self.load());

        let head = HeaderBuilder::new(StatusCode::Ok, self.max_header_len)?
            .header("Content-Type", "text/html")?
            .header("Content-Length", body.len())?
            .finish()?;

        out.write_all(&head)?;
        out.write_all(body.as_bytes())?;
        out.flush()?;
        Ok(StatusCode::Ok)
    }
}

/// Replace every placeholder token in `template`
pub fn render_template(template: &str, data: &GuestbookData) -> String {
    let count = data
        .visitor_count
        .map(|c| c.to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let remarks: String = data
        .remarks
        .iter()
        .map(|r| format!("<li>{}</li>", escape_html(r)))
        .collect::<Vec<_>>()
        .join("\n");

    template
        .replace(VISITOR_TOKEN, &count)
        .replace(REMARKS_TOKEN, &remarks)
}

/// Store-side error elements are skipped
fn remark_texts(reply: ArrayReply) -> Vec<String> {
    reply
        .into_iter()
        .filter_map(|element| match element {
            ArrayElement::Integer(i) => Some(i.to_string()),
            ArrayElement::Error(_) => None,
            ArrayElement::BulkString(_) => element.to_text(),
        })
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
