//! Console output helpers: progress indicators and run summaries.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pinedocs_core::{Outcome, RunSummary, Storage};
use std::time::Duration;

/// Spinner shown while a long-running phase is in flight.
///
/// Hidden in quiet mode; the returned bar is still safe to use.
pub fn phase_spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Report a written output file with its item count and size on disk.
pub fn file_written(storage: &Storage, file: &str, items: usize, quiet: bool) {
    if quiet {
        return;
    }

    let size = storage.size(file).unwrap_or(0);
    println!(
        "{} {} ({} items, {})",
        "✓".green(),
        storage.path(file).display(),
        items,
        human_size(size)
    );
}

/// Print the per-family run summary, listing every page that did not make it
/// into the output document.
pub fn print_summary(label: &str, summary: &RunSummary, quiet: bool) {
    if quiet {
        return;
    }

    println!(
        "{label}: {} written, {} skipped, {} failed",
        summary.succeeded.to_string().green(),
        summary.skipped,
        if summary.failed > 0 {
            summary.failed.to_string().red()
        } else {
            summary.failed.to_string().normal()
        }
    );

    for record in summary.problems() {
        let (category, reason) = match &record.outcome {
            Outcome::Skipped { category, reason } | Outcome::Failed { category, reason } => {
                (category.as_str(), reason.as_str())
            },
            Outcome::Success => continue,
        };
        println!("  {} {} [{category}] {reason}", "!".yellow(), record.url);
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        #[allow(clippy::cast_precision_loss)]
        let mb = bytes as f64 / 1_048_576.0;
        format!("{mb:.1} MB")
    } else if bytes >= 1024 {
        #[allow(clippy::cast_precision_loss)]
        let kb = bytes as f64 / 1024.0;
        format!("{kb:.1} KB")
    } else {
        format!("{bytes} B")
    }
}
