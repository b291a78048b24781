//! Boilerplate stripper: the second stage of the content normalization
//! pipeline.
//!
//! Removal rules are a small closed set of typed variants instead of
//! arbitrary selector strings. Rules apply in a fixed order; a rule that
//! matches nothing is a no-op, and applying the whole rule set twice leaves
//! the input unchanged. Element ordering of everything that survives is
//! preserved.
//!
//! Two phases exist because some boilerplate only becomes recognizable after
//! markdown conversion: [`strip_region`] removes elements from the selected
//! HTML region, and [`strip_lines`] drops residual navigation and footer
//! lines from the formatted markdown.

use crate::{Error, Result};
use ego_tree::NodeId;
use scraper::{Html, Selector};

/// An element-level removal rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalRule {
    /// Remove every element matching a tag, optionally narrowed by class
    /// (`footer`, `div.tv-pine-reference-item__see-also`).
    TagClass {
        /// Tag name.
        tag: String,
        /// Optional class the element must carry.
        class: Option<String>,
    },
    /// Remove the first element whose trimmed text equals `text`
    /// (case-insensitive) together with all of its following siblings.
    /// Models "See also" and "On this page" sections, which the source site
    /// renders as a heading followed by link lists.
    HeadingStop {
        /// Heading text to match.
        text: String,
    },
}

impl RemovalRule {
    /// Parse a `tag` or `tag.class` configuration string.
    #[must_use]
    pub fn tag_class(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((tag, class)) => Self::TagClass {
                tag: tag.to_string(),
                class: Some(class.to_string()),
            },
            None => Self::TagClass {
                tag: raw.to_string(),
                class: None,
            },
        }
    }
}

/// Apply element-level removal rules to a selected region.
///
/// Returns the region with matched elements removed and the ordering of the
/// remaining elements untouched.
pub fn strip_region(region_html: &str, rules: &[RemovalRule]) -> Result<String> {
    let mut fragment = Html::parse_fragment(region_html);

    for rule in rules {
        let doomed = match rule {
            RemovalRule::TagClass { tag, class } => {
                let raw = class
                    .as_ref()
                    .map_or_else(|| tag.clone(), |c| format!("{tag}.{c}"));
                let selector = Selector::parse(&raw)
                    .map_err(|e| Error::Config(format!("invalid removal rule '{raw}': {e}")))?;
                fragment.select(&selector).map(|el| el.id()).collect()
            },
            RemovalRule::HeadingStop { text } => heading_stop_targets(&fragment, text),
        };

        for id in doomed {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    Ok(fragment.root_element().inner_html())
}

/// Find the first element whose text equals `text` and collect it plus all
/// following siblings.
fn heading_stop_targets(fragment: &Html, text: &str) -> Vec<NodeId> {
    let Ok(any) = Selector::parse("*") else {
        return Vec::new();
    };

    for element in fragment.select(&any) {
        let element_text = element.text().collect::<String>();
        if element_text.trim().eq_ignore_ascii_case(text) {
            let mut targets = vec![element.id()];
            targets.extend(element.next_siblings().map(|node| node.id()));
            return targets;
        }
    }

    Vec::new()
}

/// Line-level removal patterns applied to formatted markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRules<'a> {
    /// Lines whose whole trimmed text equals one of these markers are
    /// dropped. Exact matching keeps prose that merely mentions a marker.
    pub skip_exact: &'a [String],
    /// Lines containing any of these substrings are dropped.
    pub skip_contains: &'a [String],
    /// Lines starting with any of these prefixes (after trimming) are dropped.
    pub skip_prefixes: &'a [String],
    /// A line containing any of these substrings ends the page; it and
    /// everything after it is dropped.
    pub stop_contains: &'a [String],
}

/// Drop residual navigation and footer lines from formatted markdown.
///
/// Idempotent: surviving lines are never rewritten, so a second pass is a
/// no-op.
#[must_use]
pub fn strip_lines(markdown: &str, rules: LineRules<'_>) -> String {
    let mut kept = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim();

        if rules.stop_contains.iter().any(|p| line.contains(p.as_str())) {
            break;
        }
        if rules.skip_exact.iter().any(|p| trimmed == p.as_str()) {
            continue;
        }
        if rules.skip_contains.iter().any(|p| line.contains(p.as_str())) {
            continue;
        }
        if rules.skip_prefixes.iter().any(|p| trimmed.starts_with(p.as_str())) {
            continue;
        }

        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}
