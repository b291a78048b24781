//! Region selector: the first stage of the content normalization pipeline.
//!
//! Given a full rendered document and a list of structural hints, locates the
//! single container holding the meaningful documentation body and returns it
//! as an HTML fragment, discarding site chrome around it. Pure functions over
//! the input HTML.

use crate::{Error, Result};
use scraper::{Html, Selector};

/// A structural hint for locating the content container.
///
/// Hints form a closed set rather than arbitrary selector strings: an element
/// id, a class name, or a bare tag name. They are tried in order and the
/// first hit wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionHint {
    /// Match by element id (`#main-content`).
    Id(String),
    /// Match by class name (`.content`).
    Class(String),
    /// Match by tag name (`article`).
    Tag(String),
}

impl RegionHint {
    /// Parse a configuration string into a hint: `#id`, `.class`, or `tag`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Some(id) = raw.strip_prefix('#') {
            Self::Id(id.to_string())
        } else if let Some(class) = raw.strip_prefix('.') {
            Self::Class(class.to_string())
        } else {
            Self::Tag(raw.to_string())
        }
    }

    fn as_selector(&self) -> Result<Selector> {
        let raw = match self {
            Self::Id(id) => format!("#{id}"),
            Self::Class(class) => format!(".{class}"),
            Self::Tag(tag) => tag.clone(),
        };
        Selector::parse(&raw).map_err(|e| Error::Config(format!("invalid region hint '{raw}': {e}")))
    }
}

/// Select the content region of a full HTML document.
///
/// Tries each hint in order and returns the outer HTML of the first matching
/// container. Fails with [`Error::ContentNotFound`] when no hint matches; the
/// caller records the page as skipped.
pub fn select_region(html: &str, hints: &[RegionHint]) -> Result<String> {
    let document = Html::parse_document(html);

    for hint in hints {
        let selector = hint.as_selector()?;
        if let Some(element) = document.select(&selector).next() {
            return Ok(element.html());
        }
    }

    Err(Error::ContentNotFound(format!(
        "no content container matched {} region hint(s)",
        hints.len()
    )))
}

/// Split the single-page reference document into per-item fragments.
///
/// Every element matching `item_selector` that carries a non-empty `id`
/// attribute becomes one logical page. Returns `(id, outer_html)` pairs in
/// document order; an empty result means the page structure changed and is
/// reported as [`Error::ContentNotFound`].
pub fn split_reference_items(html: &str, item_selector: &str) -> Result<Vec<(String, String)>> {
    let selector = Selector::parse(item_selector)
        .map_err(|e| Error::Config(format!("invalid reference item selector '{item_selector}': {e}")))?;

    let document = Html::parse_document(html);
    let items: Vec<(String, String)> = document
        .select(&selector)
        .filter_map(|el| {
            el.value()
                .attr("id")
                .filter(|id| !id.is_empty())
                .map(|id| (id.to_string(), el.html()))
        })
        .collect();

    if items.is_empty() {
        return Err(Error::ContentNotFound(format!(
            "no reference items matched '{item_selector}'"
        )));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <header><nav><ul><li><a href="/">Home</a></li></ul></nav></header>
        <aside class="sidebar">On this page</aside>
        <main><h1>Execution model</h1><p>Scripts run on every bar.</p></main>
        <footer><a href="/about">About</a></footer>
        </body></html>
    "#;

    #[test]
    fn selects_exactly_the_content_container() {
        let hints = [RegionHint::parse("main"), RegionHint::parse("article")];
        let region = select_region(PAGE, &hints).expect("main should match");

        assert!(region.contains("Execution model"));
        assert!(region.contains("Scripts run on every bar."));
        // Nothing from the site chrome leaks into the region.
        assert!(!region.contains("Home"));
        assert!(!region.contains("sidebar"));
        assert!(!region.contains("About"));
    }

    #[test]
    fn hints_are_tried_in_order() {
        let hints = [
            RegionHint::parse("#does-not-exist"),
            RegionHint::parse(".missing"),
            RegionHint::parse("main"),
        ];
        let region = select_region(PAGE, &hints).expect("fallback hint should match");
        assert!(region.contains("Execution model"));
    }

    #[test]
    fn missing_container_is_content_not_found() {
        let hints = [RegionHint::parse("article"), RegionHint::parse("#content")];
        let result = select_region(PAGE, &hints);
        assert!(matches!(result, Err(Error::ContentNotFound(_))));
    }

    #[test]
    fn splits_reference_items_by_id_in_document_order() {
        let html = r#"
            <html><body>
            <div class="tv-pine-reference-item" id="fun_alert"><h3>alert()</h3></div>
            <div class="tv-pine-reference-item"><h3>anonymous</h3></div>
            <div class="tv-pine-reference-item" id="var_close"><h3>close</h3></div>
            </body></html>
        "#;

        let items =
            split_reference_items(html, "div.tv-pine-reference-item").expect("items should match");

        // The item without an id is dropped.
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "fun_alert");
        assert_eq!(items[1].0, "var_close");
        assert!(items[0].1.contains("alert()"));
    }

    #[test]
    fn empty_reference_page_is_content_not_found() {
        let result = split_reference_items("<html><body></body></html>", "div.missing");
        assert!(matches!(result, Err(Error::ContentNotFound(_))));
    }
}
