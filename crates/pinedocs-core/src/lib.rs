//! # pinedocs-core
//!
//! Core functionality for pinedocs - a scraper that turns the Pine Script v6
//! documentation site into combined markdown files.
//!
//! The engineering surface is the content normalization pipeline: given the
//! rendered HTML of one documentation page, isolate the meaningful content
//! region, strip navigation and boilerplate, and format the result as
//! markdown while preserving code blocks, tables, and source ordering.
//! Everything around it is plumbing: a section index built from the site
//! navigation, a rate-limited fetch loop with retries, and an ordered writer
//! that keeps the combined documents in navigation order no matter how
//! concurrent fetches complete.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pinedocs_core::{HttpRenderer, Pipeline, ScrapeConfig, Storage};
//! use std::time::Duration;
//!
//! # async fn run() -> pinedocs_core::Result<()> {
//! let config = ScrapeConfig::load_or_default(None)?;
//! let renderer = HttpRenderer::new(Duration::from_secs(30))?;
//! let storage = Storage::new(&config.output.dir)?;
//!
//! let pipeline = Pipeline::new(&renderer, &config);
//! let summary = pipeline.run_reference(&storage).await?;
//! println!("{} items extracted", summary.succeeded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! All operations return [`Result<T, Error>`]. A missing content container is
//! [`Error::ContentNotFound`] and skips the page; fetch failures are retried
//! while [`Error::is_recoverable`] allows; only output write failures abort a
//! run.

/// Ordered-completion buffering and combined document generation
pub mod assembler;
/// Boilerplate stripper with a closed set of typed removal rules
pub mod clean;
/// TOML configuration: sources, fetch pacing, removal patterns, output paths
pub mod config;
/// Error types and result alias
pub mod error;
/// HTML to markdown conversion
pub mod markdown;
/// Section index construction from the site navigation
pub mod nav;
/// Run orchestration: worker pool, retries, ordered writes
pub mod pipeline;
/// Reference item extraction through the fixed sub-template
pub mod reference;
/// Rendering collaborator delivering HTML for a URL
pub mod renderer;
/// Content region selection
pub mod select;
/// Output directory management
pub mod storage;
/// Core data types: section index, pages, extraction records
pub mod types;

// Re-export commonly used types
pub use assembler::{urls_document, ContentAssembler, OrderedBuffer};
pub use clean::{strip_lines, strip_region, LineRules, RemovalRule};
pub use config::{CleanConfig, FetchConfig, OutputConfig, ScrapeConfig, SourcesConfig};
pub use error::{Error, Result};
pub use markdown::Formatter;
pub use pipeline::Pipeline;
pub use reference::ReferenceItem;
pub use renderer::{render_with_retry, HttpRenderer, Renderer};
pub use select::{select_region, split_reference_items, RegionHint};
pub use storage::Storage;
pub use types::*;
