//! PDF table extraction.
//!
//! [`PdfDocument`] owns the loaded `lopdf` document. Page layouts are
//! interpreted on first use and cached; [`PdfDocument::tables`] walks them
//! lazily in page order.

pub mod font;
pub mod layout;
pub mod segment;

use std::collections::VecDeque;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use once_cell::unsync::OnceCell;
use passbook_core::{Diagnostic, ParseError};
use tracing::{debug, warn};

use crate::table::RawTable;
pub use layout::{PageLayout, TextSpan};

pub struct PdfDocument {
    doc: Document,
    /// Page object ids, in page order
    pages: Vec<ObjectId>,
    layouts: Vec<OnceCell<Result<PageLayout, String>>>,
}

impl PdfDocument {
    /// Load a document from memory. Unparseable bytes and documents without
    /// pages are [`ParseError::DocumentUnreadable`].
    pub fn open(bytes: &[u8]) -> Result<Self, ParseError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| ParseError::DocumentUnreadable(e.to_string()))?;
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(ParseError::DocumentUnreadable("document has no pages".into()));
        }
        debug!(pages = pages.len(), "opened pdf");

        let layouts = pages.iter().map(|_| OnceCell::new()).collect();
        Ok(Self { doc, pages, layouts })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Layout of a 1-based page, or why its content could not be read.
    pub fn page_layout(&self, page: usize) -> Result<&PageLayout, &str> {
        let Some(index) = page.checked_sub(1).filter(|i| *i < self.pages.len()) else {
            return Err("no such page");
        };

        self.layouts[index]
            .get_or_init(|| {
                let page_id = self.pages[index];
                match self.page_content(page_id) {
                    Ok(content) => {
                        let fonts = font::page_fonts(&self.doc, page_id);
                        Ok(layout::interpret(page, &content.operations, &fonts))
                    }
                    Err(message) => {
                        warn!(page, %message, "page content unreadable, skipping");
                        Err(message)
                    }
                }
            })
            .as_ref()
            .map_err(String::as_str)
    }

    /// Decoded content operations of a page.
    ///
    /// lopdf keeps whatever a broken filter produced and carries on, so a
    /// filtered stream that decodes to nothing counts as unreadable here
    /// rather than as a blank page.
    fn page_content(&self, page_id: ObjectId) -> Result<Content<Vec<Operation>>, String> {
        let mut data = Vec::new();
        for id in self.doc.get_page_contents(page_id) {
            let stream = self
                .doc
                .get_object(id)
                .and_then(Object::as_stream)
                .map_err(|e| format!("content stream {} {}: {e}", id.0, id.1))?;
            let filtered = stream.filters().is_ok_and(|filters| !filters.is_empty());
            if filtered {
                let decoded = stream
                    .decompressed_content()
                    .map_err(|e| format!("content stream {} {}: {e}", id.0, id.1))?;
                if decoded.is_empty() && !stream.content.is_empty() {
                    return Err(format!(
                        "content stream {} {} could not be decompressed",
                        id.0, id.1
                    ));
                }
                data.extend(decoded);
            } else {
                data.extend_from_slice(&stream.content);
            }
            data.push(b'\n');
        }
        Content::decode(&data).map_err(|e| e.to_string())
    }

    /// Text of every readable page, one line per visual row.
    pub fn text(&self) -> String {
        (1..=self.page_count())
            .filter_map(|page| self.page_layout(page).ok())
            .map(segment::page_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lazily detected tables, in page order then top to bottom.
    pub fn tables(&self) -> Tables<'_> {
        Tables {
            doc: self,
            next_page: 1,
            pending: VecDeque::new(),
        }
    }

    /// One diagnostic per page whose content stream could not be decoded.
    pub fn unreadable_pages(&self) -> Vec<Diagnostic> {
        (1..=self.page_count())
            .filter_map(|page| match self.page_layout(page) {
                Ok(_) => None,
                Err(message) => Some(Diagnostic::PageUnreadable {
                    page,
                    message: message.to_string(),
                }),
            })
            .collect()
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.pages.len())
            .finish()
    }
}

/// Iterator returned by [`PdfDocument::tables`].
pub struct Tables<'a> {
    doc: &'a PdfDocument,
    next_page: usize,
    pending: VecDeque<RawTable>,
}

impl Iterator for Tables<'_> {
    type Item = RawTable;

    fn next(&mut self) -> Option<RawTable> {
        loop {
            if let Some(table) = self.pending.pop_front() {
                return Some(table);
            }
            if self.next_page > self.doc.page_count() {
                return None;
            }
            let page = self.next_page;
            self.next_page += 1;

            if let Ok(layout) = self.doc.page_layout(page) {
                let found = segment::tables(layout);
                debug!(page, tables = found.len(), "detected tables");
                self.pending.extend(found);
            }
        }
    }
}
