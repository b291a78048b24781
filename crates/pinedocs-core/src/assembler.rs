//! Output document assembly.
//!
//! Two concerns live here. [`OrderedBuffer`] releases concurrently completed
//! pages strictly in Section Index order, buffering out-of-order completions
//! until their predecessor has been written; it replaces any shared output
//! buffer, so the single writer needs no locking. [`ContentAssembler`] and
//! [`urls_document`] produce the combined markdown documents: a generated
//! timestamp header, a table of contents matching the Section Index, and the
//! pages themselves in index order.

use crate::types::{Family, Page, SectionIndex};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Releases completed items in strict index order.
///
/// Positions are the enumeration of [`SectionIndex::iter_pages`]. A completed
/// position is pushed with its value; a skipped or failed position is pushed
/// as a tombstone so its successors are not held up forever.
#[derive(Debug)]
pub struct OrderedBuffer<T> {
    next: usize,
    pending: BTreeMap<usize, Option<T>>,
}

impl<T> Default for OrderedBuffer<T> {
    fn default() -> Self {
        Self {
            next: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> OrderedBuffer<T> {
    /// Create an empty buffer expecting positions from 0 upward.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed position and return every value that is now ready
    /// to be written, in order.
    pub fn complete(&mut self, pos: usize, value: T) -> Vec<T> {
        self.pending.insert(pos, Some(value));
        self.drain_ready()
    }

    /// Record a position with no output (skipped or failed page) and return
    /// any successors this unblocks.
    pub fn skip(&mut self, pos: usize) -> Vec<T> {
        self.pending.insert(pos, None);
        self.drain_ready()
    }

    /// Number of completions still waiting for a predecessor.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn drain_ready(&mut self) -> Vec<T> {
        let mut ready = Vec::new();
        while let Some(slot) = self.pending.remove(&self.next) {
            if let Some(value) = slot {
                ready.push(value);
            }
            self.next += 1;
        }
        ready
    }
}

/// Markdown anchor for a section heading.
fn anchor(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Header and table of contents shared by both document kinds.
fn document_header(
    family: Family,
    kind: &str,
    index: &SectionIndex,
    generated_at: DateTime<Utc>,
) -> String {
    let mut doc = format!("# {} - {kind}\n\n", family.display_name());
    doc.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M")
    ));

    doc.push_str("## Table of Contents\n\n");
    for section in &index.sections {
        doc.push_str(&format!(
            "- [{}](#{}) ({})\n",
            section.name,
            anchor(&section.name),
            section.pages.len()
        ));
    }
    doc.push_str(&format!("\n**Total: {} items**\n\n---\n\n", index.total()));
    doc
}

/// Generate the complete URL-index document for a family.
#[must_use]
pub fn urls_document(family: Family, index: &SectionIndex, generated_at: DateTime<Utc>) -> String {
    let mut doc = document_header(family, "URL Index", index, generated_at);

    for section in &index.sections {
        doc.push_str(&format!("## {}\n\n", section.name));
        for page in &section.pages {
            doc.push_str(&format!("- [{}]({})\n", page.title, page.url));
        }
        doc.push('\n');
    }

    doc
}

/// Streaming assembler for the combined content document.
///
/// The header is written first; pages are then appended one by one in index
/// order, with a section heading emitted whenever the owning section changes.
#[derive(Debug, Default)]
pub struct ContentAssembler {
    current_section: Option<String>,
}

impl ContentAssembler {
    /// Create an assembler with no section written yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document header with the table of contents for the full index.
    #[must_use]
    pub fn header(family: Family, index: &SectionIndex, generated_at: DateTime<Utc>) -> String {
        document_header(family, "Complete Content", index, generated_at)
    }

    /// Chunk of markdown to append for one completed page.
    pub fn chunk(&mut self, page: &Page) -> String {
        let mut out = String::new();

        if self.current_section.as_deref() != Some(page.section.as_str()) {
            out.push_str(&format!("## {}\n\n", page.section));
            self.current_section = Some(page.section.clone());
        }

        out.push_str(&format!("### {}\n\n", page.page_ref.title));
        let body = page.markdown.trim();
        if !body.is_empty() {
            out.push_str(body);
            out.push_str("\n\n");
        }
        out.push_str("---\n\n");
        out
    }
}
