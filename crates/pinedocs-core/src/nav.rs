//! Section index construction.
//!
//! The index is built once before fetching, from the source site's
//! navigation, and is read-only thereafter. It fixes both the fetch order and
//! the output ordering of the combined documents.
//!
//! The reference family groups items by their id prefix on the single
//! reference page; the docs family harvests navigation links from the welcome
//! page. A previously written URL-index file can be re-parsed so the URL and
//! content steps can run separately.

use crate::select::split_reference_items;
use crate::types::{PageRef, Section, SectionIndex};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Reference section order as displayed on the site.
pub const REFERENCE_ORDER: [&str; 7] = [
    "Annotations",
    "Constants",
    "Functions",
    "Keywords",
    "Operators",
    "Types",
    "Variables",
];

/// Docs section order as displayed in the site navigation.
pub const DOCS_ORDER: [&str; 11] = [
    "Welcome",
    "Primer",
    "Language",
    "Visuals",
    "Concepts",
    "Writing",
    "Faq",
    "Error Messages",
    "Release Notes",
    "Migration Guides",
    "Where Can I Get More Information",
];

static ID_PREFIX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([a-z]+)_").expect("static regex")
});

static URL_LINE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^- \[([^\]]+)\]\(([^)]+)\)").expect("static regex")
});

/// Map a reference item id to its section name via the id prefix
/// (`fun_alert` → Functions). Unknown prefixes are uppercased; ids without a
/// prefix land in "Other".
#[must_use]
pub fn section_for_id(id: &str) -> String {
    match ID_PREFIX.captures(id).map(|c| c[1].to_string()) {
        Some(prefix) => match prefix.as_str() {
            "an" => "Annotations".to_string(),
            "const" => "Constants".to_string(),
            "fun" => "Functions".to_string(),
            "kw" => "Keywords".to_string(),
            "op" => "Operators".to_string(),
            "type" => "Types".to_string(),
            "var" => "Variables".to_string(),
            other => other.to_uppercase(),
        },
        None => "Other".to_string(),
    }
}

/// Build the reference section index from the rendered reference page.
///
/// Items keep document order within their section; sections follow the fixed
/// site order, with unknown sections appended in first-seen order.
pub fn reference_index(
    html: &str,
    reference_url: &str,
    item_selector: &str,
) -> Result<SectionIndex> {
    let items = split_reference_items(html, item_selector)?;

    let mut sections: Vec<(String, Vec<PageRef>)> = Vec::new();
    for (id, item_html) in items {
        let section = section_for_id(&id);
        let title = heading_text(&item_html).unwrap_or_else(|| id.clone());
        let page = PageRef {
            title,
            url: format!("{reference_url}#{id}"),
        };

        match sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, pages)) => pages.push(page),
            None => sections.push((section, vec![page])),
        }
    }

    Ok(order_sections(sections, &REFERENCE_ORDER))
}

/// Build the docs section index by harvesting navigation links from the
/// rendered welcome page.
///
/// Only links under `/pine-script-docs/` are kept; URLs are resolved to
/// absolute form and deduplicated within their section. The section is
/// derived from the first URL path segment.
pub fn docs_index(html: &str, docs_url: &str) -> Result<SectionIndex> {
    let base = Url::parse(docs_url)
        .map_err(|e| Error::InvalidUrl(format!("docs url '{docs_url}': {e}")))?;
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| Error::Parse(format!("link selector: {e}")))?;

    let document = Html::parse_document(html);
    let mut sections: Vec<(String, Vec<PageRef>)> = Vec::new();

    for link in document.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = link.text().collect::<String>().trim().to_string();
        if href.is_empty() || title.is_empty() || !href.contains("/pine-script-docs/") {
            continue;
        }

        let Ok(url) = base.join(href) else {
            continue;
        };
        let url = url.to_string();
        let section = section_for_docs_url(&url);

        match sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, pages)) => {
                if !pages.iter().any(|p| p.url == url) {
                    pages.push(PageRef { title, url });
                }
            },
            None => sections.push((section, vec![PageRef { title, url }])),
        }
    }

    if sections.is_empty() {
        return Err(Error::ContentNotFound(
            "no documentation links found in navigation page".to_string(),
        ));
    }

    Ok(order_sections(sections, &DOCS_ORDER))
}

/// Re-parse a previously written URL-index document back into a section
/// index, so content extraction can run without re-crawling the navigation.
#[must_use]
pub fn parse_urls_markdown(markdown: &str) -> SectionIndex {
    let mut sections: Vec<(String, Vec<PageRef>)> = Vec::new();
    let mut current = "General".to_string();

    for line in markdown.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            if !header.starts_with("Table") {
                current = header.trim().to_string();
            }
            continue;
        }
        if let Some(caps) = URL_LINE.captures(line) {
            let url = caps[2].trim().to_string();
            if !url.starts_with("http") {
                continue;
            }
            let page = PageRef {
                title: caps[1].trim().to_string(),
                url,
            };
            match sections.iter_mut().find(|(name, _)| *name == current) {
                Some((_, pages)) => pages.push(page),
                None => sections.push((current.clone(), vec![page])),
            }
        }
    }

    SectionIndex {
        sections: sections
            .into_iter()
            .map(|(name, pages)| Section { name, pages })
            .collect(),
    }
}

fn section_for_docs_url(url: &str) -> String {
    let path = url
        .split("/pine-script-docs/")
        .nth(1)
        .unwrap_or_default()
        .trim_matches('/');

    match path.split('/').next() {
        Some(segment) if !segment.is_empty() => segment
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |c| {
                    c.to_uppercase().collect::<String>() + chars.as_str()
                })
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => "General".to_string(),
    }
}

fn heading_text(item_html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(item_html);
    for heading in ["h3", "h2", "h1"] {
        let Ok(selector) = Selector::parse(heading) else {
            continue;
        };
        if let Some(el) = fragment.select(&selector).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Order sections by the fixed site order, appending unknown sections in
/// first-seen order. Page order within a section is untouched.
fn order_sections(mut found: Vec<(String, Vec<PageRef>)>, order: &[&str]) -> SectionIndex {
    let mut sections = Vec::with_capacity(found.len());

    for name in order {
        if let Some(pos) = found.iter().position(|(n, _)| n == name) {
            let (name, pages) = found.remove(pos);
            sections.push(Section { name, pages });
        }
    }
    for (name, pages) in found {
        sections.push(Section { name, pages });
    }

    SectionIndex { sections }
}
