use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content family being scraped.
///
/// The two families produce separate URL-index and content documents and use
/// different section taxonomies and extraction paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// The single-page language reference (functions, variables, ...).
    Reference,
    /// The multi-page user manual.
    Docs,
}

impl Family {
    /// Human-readable document title used in generated file headers.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Reference => "Pine Script V6 Reference",
            Self::Docs => "Pine Script V6 Documentation",
        }
    }

    /// File name of the URL-index document for this family.
    #[must_use]
    pub const fn urls_file(self) -> &'static str {
        match self {
            Self::Reference => "reference_urls.md",
            Self::Docs => "docs_urls.md",
        }
    }

    /// File name of the combined content document for this family.
    #[must_use]
    pub const fn content_file(self) -> &'static str {
        match self {
            Self::Reference => "reference_content.md",
            Self::Docs => "docs_content.md",
        }
    }
}

/// A single entry in the section index: one page (or reference item) to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    /// Page title as shown in the site navigation (or the item name).
    pub title: String,
    /// Absolute source URL; reference items carry a `#fragment`.
    pub url: String,
}

/// An ordered group of pages under one section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section name as it appears in the site navigation.
    pub name: String,
    /// Pages in document order.
    pub pages: Vec<PageRef>,
}

/// Ordered sequence of sections reflecting the source site's navigation.
///
/// Built once before fetching and read-only thereafter. Determines both fetch
/// order and output ordering: the combined document always follows this index,
/// never fetch-completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionIndex {
    /// Sections in site order.
    pub sections: Vec<Section>,
}

impl SectionIndex {
    /// Total number of pages across all sections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.sections.iter().map(|s| s.pages.len()).sum()
    }

    /// Iterate pages in index order, yielding the owning section name with
    /// each page. The enumeration position of this iterator is the page's
    /// ordering key for the output document.
    pub fn iter_pages(&self) -> impl Iterator<Item = (&str, &PageRef)> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.pages.iter().map(move |p| (s.name.as_str(), p)))
    }
}

/// A fetched and cleaned page, ready to be appended to the output document.
#[derive(Debug, Clone)]
pub struct Page {
    /// Owning section name.
    pub section: String,
    /// Reference back to the index entry.
    pub page_ref: PageRef,
    /// Cleaned markdown body. Immutable once produced.
    pub markdown: String,
}

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum Outcome {
    /// Page was extracted and written.
    Success,
    /// Page was skipped (structural mismatch such as a missing container).
    Skipped {
        /// Error category from [`crate::Error::category`].
        category: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Page failed after exhausting retries.
    Failed {
        /// Error category from [`crate::Error::category`].
        category: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Per-page metadata recorded during a run, used only for the final summary.
///
/// Records are append-only and never mutated after being written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Source URL of the page.
    pub url: String,
    /// Size of the cleaned markdown in bytes (0 for skipped/failed pages).
    pub bytes: usize,
    /// What happened to the page.
    pub outcome: Outcome,
    /// When the record was written.
    pub at: DateTime<Utc>,
}

/// Aggregate result of one family's extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Pages successfully extracted and written.
    pub succeeded: usize,
    /// Pages skipped because of structural mismatches.
    pub skipped: usize,
    /// Pages that failed after retries.
    pub failed: usize,
    /// All per-page records, in completion order.
    pub records: Vec<ExtractionRecord>,
}

impl RunSummary {
    /// Record one page outcome.
    pub fn record(&mut self, url: &str, bytes: usize, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self.records.push(ExtractionRecord {
            url: url.to_string(),
            bytes,
            outcome,
            at: Utc::now(),
        });
    }

    /// Records for pages that did not make it into the output document.
    pub fn problems(&self) -> impl Iterator<Item = &ExtractionRecord> {
        self.records
            .iter()
            .filter(|r| !matches!(r.outcome, Outcome::Success))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> SectionIndex {
        SectionIndex {
            sections: vec![
                Section {
                    name: "Language".to_string(),
                    pages: vec![
                        PageRef {
                            title: "Execution model".to_string(),
                            url: "https://example.com/docs/language/execution-model/".to_string(),
                        },
                        PageRef {
                            title: "Type system".to_string(),
                            url: "https://example.com/docs/language/type-system/".to_string(),
                        },
                    ],
                },
                Section {
                    name: "Concepts".to_string(),
                    pages: vec![PageRef {
                        title: "Alerts".to_string(),
                        url: "https://example.com/docs/concepts/alerts/".to_string(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn iter_pages_preserves_section_and_document_order() {
        let index = sample_index();
        let flat: Vec<_> = index.iter_pages().collect();

        assert_eq!(index.total(), 3);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0].0, "Language");
        assert_eq!(flat[0].1.title, "Execution model");
        assert_eq!(flat[2].0, "Concepts");
        assert_eq!(flat[2].1.title, "Alerts");
    }

    #[test]
    fn summary_counts_by_outcome() {
        let mut summary = RunSummary::default();
        summary.record("https://example.com/a", 120, Outcome::Success);
        summary.record(
            "https://example.com/b",
            0,
            Outcome::Skipped {
                category: "content_not_found".to_string(),
                reason: "no main container".to_string(),
            },
        );
        summary.record(
            "https://example.com/c",
            0,
            Outcome::Failed {
                category: "fetch".to_string(),
                reason: "status 503".to_string(),
            },
        );

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.problems().count(), 2);
    }

    #[test]
    fn family_file_names_are_stable() {
        assert_eq!(Family::Reference.content_file(), "reference_content.md");
        assert_eq!(Family::Docs.urls_file(), "docs_urls.md");
    }
}
