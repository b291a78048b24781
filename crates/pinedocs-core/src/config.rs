//! Configuration for the scraper.
//!
//! Configuration is stored in TOML format next to the output directory (the
//! default path is `pinedocs.toml` in the working directory). Every removal
//! pattern used by the boilerplate stripper lives here rather than in code:
//! the source site's markup is not a stable contract, so the exact match
//! patterns are configuration with defaults mirroring the current site.
//!
//! ## Example configuration file
//!
//! ```toml
//! [sources]
//! reference_url = "https://www.tradingview.com/pine-script-reference/v6/"
//! docs_url = "https://www.tradingview.com/pine-script-docs/welcome/"
//!
//! [fetch]
//! timeout_secs = 30
//! delay_ms = 500
//! retries = 3
//! concurrency = 4
//!
//! [clean]
//! heading_stop = ["See also", "On this page"]
//!
//! [output]
//! dir = "output"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root URLs of the two content families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Root URL of the single-page language reference.
    pub reference_url: String,
    /// Entry URL of the user-manual navigation.
    pub docs_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            reference_url: "https://www.tradingview.com/pine-script-reference/v6/".to_string(),
            docs_url: "https://www.tradingview.com/pine-script-docs/welcome/".to_string(),
        }
    }
}

/// Fetch behavior: timeouts, pacing, retries, and worker-pool size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Delay between successive fetches in one worker, in milliseconds.
    /// Protects the source site from overload.
    pub delay_ms: u64,
    /// Maximum fetch attempts per page before it is recorded as failed.
    pub retries: u32,
    /// Maximum number of in-flight page fetches.
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            delay_ms: 500,
            retries: 3,
            concurrency: 4,
        }
    }
}

/// Patterns driving the region selector and the boilerplate stripper.
///
/// `docs_region` entries are structural hints tried in order (`#id`,
/// `.class`, or a bare tag name); the first match wins. The remaining lists
/// feed the stripper's closed rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Content-container hints for user-manual pages, tried in order.
    pub docs_region: Vec<String>,
    /// Selector for one reference item on the reference page.
    pub reference_item: String,
    /// Content-container hint inside one reference item.
    pub reference_region: String,
    /// Elements removed wherever they appear, as `tag` or `tag.class`.
    pub strip: Vec<String>,
    /// Headings that terminate content: the matching element and all of its
    /// following siblings are removed (case-insensitive text match).
    pub heading_stop: Vec<String>,
    /// Markdown lines whose whole trimmed text equals one of these markers
    /// are dropped. Exact matching keeps prose that merely mentions the
    /// marker ("Pine Script®" appears constantly in running text).
    pub skip_line_exact: Vec<String>,
    /// Markdown lines starting with any of these prefixes are dropped
    /// (pagination links).
    pub skip_line_prefixes: Vec<String>,
    /// Markdown lines containing any of these substrings are dropped.
    pub skip_line_contains: Vec<String>,
    /// A markdown line containing any of these substrings ends the page;
    /// everything from that line on is dropped.
    pub stop_line_contains: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            docs_region: vec![
                "main".to_string(),
                "article".to_string(),
                ".content".to_string(),
                "body".to_string(),
            ],
            reference_item: "div.tv-pine-reference-item".to_string(),
            reference_region: ".tv-pine-reference-item__content".to_string(),
            strip: vec![
                "script".to_string(),
                "style".to_string(),
                "nav".to_string(),
                "aside".to_string(),
                "header".to_string(),
                "footer".to_string(),
                "div.tv-pine-reference-item__see-also".to_string(),
            ],
            heading_stop: vec!["See also".to_string(), "On this page".to_string()],
            skip_line_exact: vec!["Copied".to_string(), "Pine Script®".to_string()],
            skip_line_prefixes: vec!["Previous".to_string(), "Next".to_string()],
            skip_line_contains: vec![
                "Pine Q&A chat".to_string(),
                "Stack Overflow".to_string(),
                "Telegram".to_string(),
                "Reddit".to_string(),
                "Discord".to_string(),
                "Facebook".to_string(),
                "Twitter".to_string(),
                "YouTube".to_string(),
                "LinkedIn".to_string(),
                "↗".to_string(),
            ],
            stop_line_contains: vec!["Copyright".to_string()],
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the generated markdown files.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

/// Top-level scraper configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Root URLs per family.
    pub sources: SourcesConfig,
    /// Fetch pacing and retry behavior.
    pub fetch: FetchConfig,
    /// Region hints and removal patterns.
    pub clean: CleanConfig,
    /// Output locations.
    pub output: OutputConfig,
}

impl ScrapeConfig {
    /// Default configuration file name, looked up in the working directory.
    pub const DEFAULT_FILE: &'static str = "pinedocs.toml";

    /// Load configuration from `path`, or from `pinedocs.toml` in the working
    /// directory, falling back to defaults when neither exists.
    ///
    /// An explicitly given path that cannot be read is an error; the implicit
    /// default path is allowed to be absent.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let raw = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read config '{}': {e}", path.display()))
            })?;
            return Ok(toml::from_str(&raw)?);
        }

        let default_path = Path::new(Self::DEFAULT_FILE);
        if default_path.exists() {
            let raw = fs::read_to_string(default_path)?;
            return Ok(toml::from_str(&raw)?);
        }

        Ok(Self::default())
    }

    /// Save the configuration to `path` in TOML format.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
