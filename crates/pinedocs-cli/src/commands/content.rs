//! Content command: fetch and clean pages into the combined content files.

use anyhow::Result;
use pinedocs_core::{nav, Family, HttpRenderer, Pipeline, ScrapeConfig, SectionIndex, Storage};
use std::time::Duration;
use tracing::info;

use crate::cli::Target;
use crate::output;

/// Extract the selected families into their combined content documents.
pub async fn execute(config: &ScrapeConfig, target: Target, quiet: bool) -> Result<()> {
    let renderer = HttpRenderer::new(Duration::from_secs(config.fetch.timeout_secs))?;
    let storage = Storage::new(&config.output.dir)?;
    let pipeline = Pipeline::new(&renderer, config);

    if target.includes_reference() {
        let spinner = output::phase_spinner(quiet, "Extracting the language reference...");
        let summary = pipeline.run_reference(&storage).await?;
        spinner.finish_and_clear();
        output::file_written(
            &storage,
            Family::Reference.content_file(),
            summary.succeeded,
            quiet,
        );
        output::print_summary("Reference", &summary, quiet);
    }

    if target.includes_docs() {
        let index = docs_index(&pipeline, &storage).await?;
        let spinner = output::phase_spinner(
            quiet,
            &format!("Extracting {} user-manual pages...", index.total()),
        );
        let summary = pipeline.run_docs(&index, &storage).await?;
        spinner.finish_and_clear();
        output::file_written(
            &storage,
            Family::Docs.content_file(),
            summary.succeeded,
            quiet,
        );
        output::print_summary("Docs", &summary, quiet);
    }

    Ok(())
}

/// Reuse a previously written `docs_urls.md` when one exists, so the urls and
/// content steps can run separately; otherwise build the index fresh.
async fn docs_index(pipeline: &Pipeline<'_>, storage: &Storage) -> Result<SectionIndex> {
    let urls_file = Family::Docs.urls_file();
    if storage.exists(urls_file) {
        let markdown = storage.read(urls_file)?;
        let index = nav::parse_urls_markdown(&markdown);
        if index.total() > 0 {
            info!("Reusing {} ({} URLs)", urls_file, index.total());
            return Ok(index);
        }
    }
    Ok(pipeline.docs_index().await?)
}
