//! Urls command: build the section indexes and write the URL-index files.

use anyhow::Result;
use pinedocs_core::{Family, HttpRenderer, Pipeline, ScrapeConfig, Storage};
use std::time::Duration;

use crate::cli::Target;
use crate::output;

/// Write the URL-index file for each selected family.
pub async fn execute(config: &ScrapeConfig, target: Target, quiet: bool) -> Result<()> {
    let renderer = HttpRenderer::new(Duration::from_secs(config.fetch.timeout_secs))?;
    let storage = Storage::new(&config.output.dir)?;
    let pipeline = Pipeline::new(&renderer, config);

    if target.includes_reference() {
        let spinner = output::phase_spinner(quiet, "Indexing the language reference...");
        let index = pipeline.reference_index().await?;
        pipeline.write_urls(Family::Reference, &index, &storage)?;
        spinner.finish_and_clear();
        output::file_written(&storage, Family::Reference.urls_file(), index.total(), quiet);
    }

    if target.includes_docs() {
        let spinner = output::phase_spinner(quiet, "Indexing the user manual...");
        let index = pipeline.docs_index().await?;
        pipeline.write_urls(Family::Docs, &index, &storage)?;
        spinner.finish_and_clear();
        output::file_written(&storage, Family::Docs.urls_file(), index.total(), quiet);
    }

    Ok(())
}
