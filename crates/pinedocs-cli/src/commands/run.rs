//! Run command: URL indexes first, then content extraction, as one pass.

use anyhow::{bail, Result};
use colored::Colorize;
use pinedocs_core::ScrapeConfig;
use tracing::error;

use crate::cli::Target;
use crate::commands;

/// Execute `urls` and `content` for both families in sequence.
///
/// A failing reference phase does not stop the docs phase; each failure is
/// reported and the command exits non-zero if any phase failed.
pub async fn execute(config: &ScrapeConfig, quiet: bool) -> Result<()> {
    let mut failures: Vec<String> = Vec::new();

    for (target, label) in [(Target::Reference, "reference"), (Target::Docs, "docs")] {
        if let Err(e) = phase(config, target, quiet).await {
            error!("{label} extraction failed: {e}");
            if !quiet {
                eprintln!("{} {label}: {e}", "✗".red());
            }
            failures.push(label.to_string());
        }
    }

    if !failures.is_empty() {
        bail!("extraction failed for: {}", failures.join(", "));
    }
    Ok(())
}

async fn phase(config: &ScrapeConfig, target: Target, quiet: bool) -> Result<()> {
    commands::urls(config, target, quiet).await?;
    commands::content(config, target, quiet).await
}
