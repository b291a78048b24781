//! Per-page extraction pipeline and run orchestration.
//!
//! Pages are independent: each one goes through fetch → select → strip →
//! format on its own. A bounded worker pool fetches user-manual pages
//! concurrently with a fixed inter-request delay; completions are pushed
//! through the [`OrderedBuffer`] so the single writer appends pages in
//! Section Index order no matter how fetches interleave. The reference family
//! is one rendered page split into items, processed in document order.
//!
//! Failure policy: a recoverable fetch error is retried with backoff, then
//! the page is recorded failed; a structural mismatch records a skip. Either
//! way the run continues. Only output-file write failures propagate.

use crate::assembler::{urls_document, ContentAssembler, OrderedBuffer};
use crate::clean::{strip_lines, strip_region, LineRules, RemovalRule};
use crate::config::ScrapeConfig;
use crate::markdown::{repair_fences, Formatter};
use crate::nav;
use crate::reference::extract_item;
use crate::renderer::{render_with_retry, Renderer};
use crate::select::{select_region, split_reference_items, RegionHint};
use crate::storage::Storage;
use crate::types::{Family, Outcome, Page, PageRef, RunSummary, SectionIndex};
use crate::{Error, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Heading level of a page title inside the combined documents: sections are
/// `##`, page titles `###`.
const PAGE_HEADING_BASE: usize = 3;

/// Orchestrates extraction runs against a renderer.
pub struct Pipeline<'a> {
    renderer: &'a dyn Renderer,
    config: &'a ScrapeConfig,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over a renderer and configuration.
    #[must_use]
    pub const fn new(renderer: &'a dyn Renderer, config: &'a ScrapeConfig) -> Self {
        Self { renderer, config }
    }

    /// Build the reference section index by rendering the reference page.
    pub async fn reference_index(&self) -> Result<SectionIndex> {
        let html = self.render(&self.config.sources.reference_url).await?;
        nav::reference_index(
            &html,
            &self.config.sources.reference_url,
            &self.config.clean.reference_item,
        )
    }

    /// Build the docs section index by rendering the navigation page.
    pub async fn docs_index(&self) -> Result<SectionIndex> {
        let html = self.render(&self.config.sources.docs_url).await?;
        nav::docs_index(&html, &self.config.sources.docs_url)
    }

    /// Write the URL-index document for a family.
    pub fn write_urls(
        &self,
        family: Family,
        index: &SectionIndex,
        storage: &Storage,
    ) -> Result<()> {
        let doc = urls_document(family, index, Utc::now());
        storage.create(family.urls_file(), &doc)?;
        info!(
            "Wrote {} ({} URLs)",
            family.urls_file(),
            index.total()
        );
        Ok(())
    }

    /// Extract the whole reference into its combined content document.
    ///
    /// The reference is a single rendered page; items are split out and
    /// processed in document order, so no concurrency machinery is involved.
    pub async fn run_reference(&self, storage: &Storage) -> Result<RunSummary> {
        let root_url = &self.config.sources.reference_url;
        let html = self.render(root_url).await?;

        let index = nav::reference_index(&html, root_url, &self.config.clean.reference_item)?;
        let items = split_reference_items(&html, &self.config.clean.reference_item)?;

        let file = Family::Reference.content_file();
        storage.create(
            file,
            &ContentAssembler::header(Family::Reference, &index, Utc::now()),
        )?;

        let formatter = Formatter::new(Url::parse(root_url).ok())
            .with_heading_base(PAGE_HEADING_BASE);
        let mut assembler = ContentAssembler::new();
        let mut summary = RunSummary::default();

        // Index order, not page order: sections follow the fixed site order.
        for (section, page_ref) in index.iter_pages() {
            let id = page_ref.url.rsplit('#').next().unwrap_or_default();
            let Some((_, item_html)) = items.iter().find(|(item_id, _)| item_id == id) else {
                continue;
            };

            match extract_item(id, item_html, &self.config.clean, &formatter) {
                Ok(item) => {
                    let page = Page {
                        section: section.to_string(),
                        page_ref: page_ref.clone(),
                        markdown: item.render(),
                    };
                    summary.record(&page.page_ref.url, page.markdown.len(), Outcome::Success);
                    storage.append(file, &assembler.chunk(&page))?;
                },
                Err(e) => {
                    warn!("Skipping reference item '{id}': {e}");
                    summary.record(
                        &page_ref.url,
                        0,
                        Outcome::Skipped {
                            category: e.category().to_string(),
                            reason: e.to_string(),
                        },
                    );
                },
            }
        }

        info!(
            "Reference: {} items written, {} skipped",
            summary.succeeded, summary.skipped
        );
        Ok(summary)
    }

    /// Extract user-manual pages into their combined content document.
    ///
    /// Pages are fetched by a bounded worker pool; the ordered-completion
    /// buffer guarantees the output document follows `index` regardless of
    /// completion order.
    pub async fn run_docs(&self, index: &SectionIndex, storage: &Storage) -> Result<RunSummary> {
        let file = Family::Docs.content_file();
        storage.create(
            file,
            &ContentAssembler::header(Family::Docs, index, Utc::now()),
        )?;

        let pages: Vec<(usize, String, PageRef)> = index
            .iter_pages()
            .enumerate()
            .map(|(pos, (section, page))| (pos, section.to_string(), page.clone()))
            .collect();
        let total = pages.len();

        let mut completions = stream::iter(pages.into_iter().map(|(pos, section, page_ref)| {
            async move {
                let result = self.process_docs_page(&page_ref).await;
                (pos, section, page_ref, result)
            }
        }))
        .buffer_unordered(self.config.fetch.concurrency.max(1));

        let mut assembler = ContentAssembler::new();
        let mut buffer = OrderedBuffer::new();
        let mut summary = RunSummary::default();
        let mut done = 0usize;

        while let Some((pos, section, page_ref, result)) = completions.next().await {
            done += 1;
            debug!("[{done}/{total}] {}", page_ref.title);

            let ready = match result {
                Ok(markdown) => {
                    summary.record(&page_ref.url, markdown.len(), Outcome::Success);
                    buffer.complete(
                        pos,
                        Page {
                            section,
                            page_ref,
                            markdown,
                        },
                    )
                },
                Err(e @ Error::ContentNotFound(_)) => {
                    warn!("Skipping {}: {e}", page_ref.url);
                    summary.record(
                        &page_ref.url,
                        0,
                        Outcome::Skipped {
                            category: e.category().to_string(),
                            reason: e.to_string(),
                        },
                    );
                    buffer.skip(pos)
                },
                Err(e) => {
                    warn!("Failed {}: {e}", page_ref.url);
                    summary.record(
                        &page_ref.url,
                        0,
                        Outcome::Failed {
                            category: e.category().to_string(),
                            reason: e.to_string(),
                        },
                    );
                    buffer.skip(pos)
                },
            };

            for page in ready {
                storage.append(file, &assembler.chunk(&page))?;
            }
        }

        info!(
            "Docs: {} pages written, {} skipped, {} failed",
            summary.succeeded, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    /// Fetch one docs page and run it through select → strip → format.
    async fn process_docs_page(&self, page_ref: &PageRef) -> Result<String> {
        // Fixed inter-request delay protects the source site; with a bounded
        // pool this caps the sustained request rate.
        let delay = Duration::from_millis(self.config.fetch.delay_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let html = self.render(&page_ref.url).await?;
        self.normalize_docs_page(&html, page_ref)
    }

    /// The pure part of the docs pipeline: select → strip → format.
    fn normalize_docs_page(&self, html: &str, page_ref: &PageRef) -> Result<String> {
        let clean = &self.config.clean;

        let hints: Vec<RegionHint> = clean
            .docs_region
            .iter()
            .map(|raw| RegionHint::parse(raw))
            .collect();
        let region = select_region(html, &hints)?;

        let mut rules: Vec<RemovalRule> =
            clean.strip.iter().map(|s| RemovalRule::tag_class(s)).collect();
        for heading in &clean.heading_stop {
            rules.push(RemovalRule::HeadingStop {
                text: heading.clone(),
            });
        }
        let stripped = strip_region(&region, &rules)?;

        let formatter = Formatter::new(Url::parse(&page_ref.url).ok())
            .with_heading_base(PAGE_HEADING_BASE);
        let markdown = formatter.format_fragment(&stripped, Some(&page_ref.title));

        let markdown = strip_lines(
            &markdown,
            LineRules {
                skip_exact: &clean.skip_line_exact,
                skip_contains: &clean.skip_line_contains,
                skip_prefixes: &clean.skip_line_prefixes,
                stop_contains: &clean.stop_line_contains,
            },
        );

        Ok(repair_fences(&markdown))
    }

    async fn render(&self, url: &str) -> Result<String> {
        render_with_retry(
            self.renderer,
            url,
            self.config.fetch.retries,
            Duration::from_millis(self.config.fetch.delay_ms.max(100)),
        )
        .await
    }
}
