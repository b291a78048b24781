//! Reference item extraction.
//!
//! The language reference is one rendered page holding hundreds of item divs
//! (functions, variables, keywords, ...). Each item is normalized into a
//! fixed sub-template so every entry has identical shape across the whole
//! reference output:
//!
//! ````markdown
//! <description>
//!
//! **Syntax**
//! ```pine
//! <signature>
//! ```
//!
//! **Arguments** / **Type** / **Example** / **Remarks** ... (source order)
//! ````
//!
//! A missing substructure is emitted blank rather than dropped, and an item
//! never fails the page: when nothing structured can be found the item falls
//! back to its flattened text.

use crate::clean::{strip_region, RemovalRule};
use crate::config::CleanConfig;
use crate::markdown::{normalize, Formatter};
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// Name of the substructure every reference item must carry exactly once.
const SYNTAX_HEADER: &str = "Syntax";

/// One normalized reference entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    /// Element id on the reference page (`fun_alert`, `var_close`, ...).
    pub id: String,
    /// Item name from its heading, falling back to the id.
    pub name: String,
    /// Description text preceding the first sub-header. Blank when the
    /// source omits it.
    pub description: String,
    /// Body of the syntax substructure. Blank when the source omits it.
    pub syntax: String,
    /// Remaining substructures in source order: (header, markdown body).
    pub sections: Vec<(String, String)>,
}

impl ReferenceItem {
    /// Render the item through the fixed sub-template.
    ///
    /// The output always contains exactly one description block and exactly
    /// one syntax block, each possibly blank.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(self.description.trim());
        out.push_str("\n\n");

        out.push_str(&format!("**{SYNTAX_HEADER}**\n"));
        out.push_str(self.syntax.trim());
        out.push('\n');

        for (header, body) in &self.sections {
            out.push_str(&format!("\n**{header}**\n"));
            out.push_str(body.trim());
            out.push('\n');
        }

        normalize(&out)
    }
}

/// Extract one reference item from its outer HTML.
///
/// `item_html` is one `div.tv-pine-reference-item` fragment produced by
/// [`crate::select::split_reference_items`].
pub fn extract_item(
    id: &str,
    item_html: &str,
    clean: &CleanConfig,
    formatter: &Formatter,
) -> Result<ReferenceItem> {
    let name = item_name(item_html, id);

    // Strip scripts, styles and the trailing "See also" material before
    // walking the content structure.
    let mut rules: Vec<RemovalRule> = clean.strip.iter().map(|s| RemovalRule::tag_class(s)).collect();
    for heading in &clean.heading_stop {
        rules.push(RemovalRule::HeadingStop {
            text: heading.clone(),
        });
    }
    let stripped = strip_region(item_html, &rules)?;

    let fragment = Html::parse_fragment(&stripped);
    let content_selector = Selector::parse(&clean.reference_region).map_err(|e| {
        Error::Config(format!(
            "invalid reference region '{}': {e}",
            clean.reference_region
        ))
    })?;
    let content = fragment
        .select(&content_selector)
        .next()
        .unwrap_or_else(|| fragment.root_element());

    let mut item = walk_content(id, name, content, formatter);

    // Fallback for items whose markup does not follow the reference
    // structure at all: keep their flattened text as the description.
    if item.description.is_empty() && item.syntax.is_empty() && item.sections.is_empty() {
        item.description = normalize(&content.text().collect::<String>());
    }

    Ok(item)
}

fn item_name(item_html: &str, id: &str) -> String {
    let fragment = Html::parse_fragment(item_html);
    for heading in ["h3", "h2", "h1"] {
        let Ok(selector) = Selector::parse(heading) else {
            continue;
        };
        if let Some(el) = fragment.select(&selector).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return text;
            }
        }
    }
    id.to_string()
}

fn walk_content(
    id: &str,
    name: String,
    content: ElementRef<'_>,
    formatter: &Formatter,
) -> ReferenceItem {
    let mut description_parts: Vec<String> = Vec::new();
    let mut sections: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for el in content.descendants().filter_map(ElementRef::wrap) {
        let tag = el.value().name();
        if !matches!(tag, "div" | "pre" | "code") {
            continue;
        }
        let classes = el.value().attr("class").unwrap_or_default();

        if classes.contains("tv-pine-reference-item__sub-header") {
            let header = el.text().collect::<String>().trim().to_string();
            if header.eq_ignore_ascii_case("see also") {
                break;
            }
            if let Some((header, parts)) = current.take() {
                sections.push((header, parts.join("\n\n")));
            }
            current = Some((header, Vec::new()));
        } else if classes.contains("tv-pine-reference-item__text-group")
            || classes.contains("tv-pine-reference-item__text")
        {
            let text = formatter.inline_text(el);
            if text.is_empty() {
                continue;
            }
            match current.as_mut() {
                Some((_, parts)) => parts.push(text),
                None => description_parts.push(text),
            }
        } else if tag == "pre" || classes.contains("tv-pine-reference-item__code") {
            let Some(block) = formatter.code_block(el) else {
                continue;
            };
            match current.as_mut() {
                Some((_, parts)) => parts.push(block),
                None => description_parts.push(block),
            }
        }
    }

    if let Some((header, parts)) = current.take() {
        sections.push((header, parts.join("\n\n")));
    }

    // Pull the syntax substructure out so the template can guarantee its
    // presence exactly once.
    let syntax = match sections
        .iter()
        .position(|(header, _)| header.eq_ignore_ascii_case(SYNTAX_HEADER))
    {
        Some(pos) => sections.remove(pos).1,
        None => String::new(),
    };

    ReferenceItem {
        id: id.to_string(),
        name,
        description: description_parts.join("\n\n"),
        syntax,
        sections,
    }
}
