//! CLI structure and argument parsing.
//!
//! `pinedocs` follows a command-subcommand pattern:
//!
//! ```bash
//! # Write the URL-index files only
//! pinedocs urls
//!
//! # Fetch and clean pages into the combined content files
//! pinedocs content docs
//!
//! # Both steps in sequence
//! pinedocs run --concurrency 8 --output-dir out
//! ```
//!
//! Global flags override the corresponding configuration values, so a config
//! file is never required for one-off runs.

use clap::{Parser, Subcommand, ValueEnum};
use pinedocs_core::ScrapeConfig;
use std::path::PathBuf;

/// Top-level CLI for the `pinedocs` command.
#[derive(Parser, Debug)]
#[command(name = "pinedocs")]
#[command(version)]
#[command(about = "Turn the Pine Script v6 documentation into combined markdown files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show warnings and errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum in-flight page fetches (overrides configuration)
    #[arg(long, global = true, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Delay between fetches in milliseconds (overrides configuration)
    #[arg(long, global = true, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Reference page URL (overrides configuration)
    #[arg(long, global = true, value_name = "URL")]
    pub reference_url: Option<String>,

    /// User-manual navigation URL (overrides configuration)
    #[arg(long, global = true, value_name = "URL")]
    pub docs_url: Option<String>,
}

impl Cli {
    /// Load the configuration file and fold the CLI overrides into it.
    pub fn effective_config(&self) -> anyhow::Result<ScrapeConfig> {
        let mut config = ScrapeConfig::load_or_default(self.config.as_deref())?;

        if let Some(dir) = &self.output_dir {
            config.output.dir.clone_from(dir);
        }
        if let Some(concurrency) = self.concurrency {
            config.fetch.concurrency = concurrency;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.fetch.delay_ms = delay_ms;
        }
        if let Some(url) = &self.reference_url {
            config.sources.reference_url.clone_from(url);
        }
        if let Some(url) = &self.docs_url {
            config.sources.docs_url.clone_from(url);
        }

        Ok(config)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the section indexes and write the URL-index files
    Urls {
        /// Which content family to index
        #[arg(value_enum, default_value_t = Target::All)]
        target: Target,
    },
    /// Fetch and clean pages, writing the combined content files
    ///
    /// The docs family reuses a previously written `docs_urls.md` when one
    /// exists in the output directory; otherwise the index is built fresh.
    Content {
        /// Which content family to extract
        #[arg(value_enum, default_value_t = Target::All)]
        target: Target,
    },
    /// Write the URL indexes, then the content files (urls + content)
    Run,
}

/// Content-family selection shared by `urls` and `content`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The single-page language reference.
    Reference,
    /// The multi-page user manual.
    Docs,
    /// Both families.
    All,
}

impl Target {
    /// Whether the reference family is selected.
    #[must_use]
    pub fn includes_reference(self) -> bool {
        matches!(self, Self::Reference | Self::All)
    }

    /// Whether the docs family is selected.
    #[must_use]
    pub fn includes_docs(self) -> bool {
        matches!(self, Self::Docs | Self::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "pinedocs",
            "--output-dir",
            "custom-out",
            "--concurrency",
            "9",
            "--docs-url",
            "https://example.com/docs/",
            "run",
        ]);

        let config = cli.effective_config().expect("config");
        assert_eq!(config.output.dir, PathBuf::from("custom-out"));
        assert_eq!(config.fetch.concurrency, 9);
        assert_eq!(config.sources.docs_url, "https://example.com/docs/");
        // Untouched values keep their defaults.
        assert_eq!(config.fetch.retries, 3);
    }

    #[test]
    fn target_defaults_to_all() {
        let cli = Cli::parse_from(["pinedocs", "urls"]);
        match cli.command {
            Commands::Urls { target } => {
                assert!(target.includes_reference());
                assert!(target.includes_docs());
            },
            _ => panic!("expected urls subcommand"),
        }
    }
}
