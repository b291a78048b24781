//! Markdown formatter: the third stage of the content normalization pipeline.
//!
//! Converts a cleaned HTML region into markdown deterministically:
//!
//! - code blocks keep a fenced representation tagged with the language found
//!   on the block, defaulting to `pine`;
//! - tables become pipe-delimited markdown with the header row preserved;
//! - heading levels are renumbered relative to the page, so the page title is
//!   the H1-equivalent and nested subsections shift down consistently;
//! - inline links are preserved with absolute URLs resolved against the page;
//! - inline elements get surrounding spaces so `the library() function` never
//!   collapses into `thelibrary()function`.
//!
//! Section ordering always matches the source page. A missing substructure
//! degrades to blank output for that element, never to a page failure.

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\n{3,}").expect("static regex")
});

static COLLAPSE_SPACES: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[ \t]{2,}").expect("static regex")
});

/// Deterministic HTML-to-markdown formatter for one page.
#[derive(Debug, Clone)]
pub struct Formatter {
    base_url: Option<Url>,
    /// Heading level at which the page title sits in the combined document.
    /// Body headings are renumbered relative to it.
    heading_base: usize,
    default_lang: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            base_url: None,
            heading_base: 1,
            default_lang: "pine".to_string(),
        }
    }
}

impl Formatter {
    /// Create a formatter resolving relative links against `base_url`.
    #[must_use]
    pub fn new(base_url: Option<Url>) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Set the heading level the page title occupies in the output document.
    #[must_use]
    pub const fn with_heading_base(mut self, base: usize) -> Self {
        self.heading_base = base;
        self
    }

    /// Format a cleaned HTML region as markdown.
    ///
    /// When `title` is given, the first heading with that exact text is
    /// dropped (the assembler emits the title itself); every other heading is
    /// shifted down relative to `heading_base`.
    #[must_use]
    pub fn format_fragment(&self, html: &str, title: Option<&str>) -> String {
        let fragment = Html::parse_fragment(html);
        let mut state = WalkState {
            blocks: Vec::new(),
            title_seen: false,
        };

        for child in fragment.root_element().children() {
            self.walk_block(child, title, &mut state);
        }

        normalize(&state.blocks.join("\n\n"))
    }

    fn walk_block(
        &self,
        node: NodeRef<'_, Node>,
        title: Option<&str>,
        state: &mut WalkState,
    ) {
        if let Node::Text(text) = node.value() {
            let text = text.trim();
            if !text.is_empty() {
                state.blocks.push(text.to_string());
            }
            return;
        }

        let Some(element) = ElementRef::wrap(node) else {
            return;
        };

        match element.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.push_heading(element, title, state);
            },
            "p" | "blockquote" => {
                let text = self.inline_text(element);
                if !text.trim().is_empty() {
                    if element.value().name() == "blockquote" {
                        state.blocks.push(format!("> {}", text.trim()));
                    } else {
                        state.blocks.push(text.trim().to_string());
                    }
                }
            },
            "pre" => {
                if let Some(block) = self.code_block(element) {
                    state.blocks.push(block);
                }
            },
            "table" => {
                if let Some(table) = self.table(element) {
                    state.blocks.push(table);
                }
            },
            "ul" | "ol" => {
                let list = self.list(element, element.value().name() == "ol");
                if !list.is_empty() {
                    state.blocks.push(list);
                }
            },
            "script" | "style" | "noscript" | "template" | "button" | "svg" => {},
            "br" | "hr" => {},
            _ => {
                // Containers: recurse when block children exist, otherwise
                // treat direct inline content as one paragraph.
                if has_block_children(element) {
                    for child in node.children() {
                        self.walk_block(child, title, state);
                    }
                } else {
                    let text = self.inline_text(element);
                    if !text.trim().is_empty() {
                        state.blocks.push(text.trim().to_string());
                    }
                }
            },
        }
    }

    fn push_heading(&self, element: ElementRef<'_>, title: Option<&str>, state: &mut WalkState) {
        let text = self.inline_text(element);
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        // The page title is emitted by the assembler; drop its first
        // occurrence so it does not appear twice.
        if !state.title_seen {
            if let Some(title) = title {
                if text.eq_ignore_ascii_case(title.trim()) {
                    state.title_seen = true;
                    return;
                }
            }
        }

        let source_level = element.value().name()[1..].parse::<usize>().unwrap_or(1);
        // The title is the page's H1-equivalent at `heading_base`; every
        // other heading shifts down by the same amount.
        let level = (self.heading_base + source_level.saturating_sub(1)).min(6);
        state.blocks.push(format!("{} {text}", "#".repeat(level)));
    }

    /// Inline rendering with spacing repair between adjacent inline elements.
    pub(crate) fn inline_text(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.inline_children(element, &mut out);
        COLLAPSE_SPACES.replace_all(&out, " ").trim().to_string()
    }

    fn inline_children(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    let Some(el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    match el.value().name() {
                        "br" => out.push('\n'),
                        "script" | "style" | "noscript" | "button" | "svg" => {},
                        "a" => {
                            let text = plain_text(el);
                            if text.is_empty() {
                                continue;
                            }
                            pad(out);
                            match self.resolve_href(el.value().attr("href")) {
                                Some(href) => {
                                    out.push_str(&format!("[{text}]({href})"));
                                },
                                None => out.push_str(&text),
                            }
                            out.push(' ');
                        },
                        "code" => {
                            let text = plain_text(el);
                            if text.is_empty() {
                                continue;
                            }
                            pad(out);
                            out.push('`');
                            out.push_str(&text);
                            out.push_str("` ");
                        },
                        "strong" | "b" => {
                            let text = plain_text(el);
                            if text.is_empty() {
                                continue;
                            }
                            pad(out);
                            out.push_str(&format!("**{text}** "));
                        },
                        "em" | "i" => {
                            let text = plain_text(el);
                            if text.is_empty() {
                                continue;
                            }
                            pad(out);
                            out.push_str(&format!("*{text}* "));
                        },
                        _ => self.inline_children(el, out),
                    }
                },
                _ => {},
            }
        }
    }

    fn resolve_href(&self, href: Option<&str>) -> Option<String> {
        let href = href?.trim();
        if href.is_empty() {
            return None;
        }
        if let Ok(absolute) = Url::parse(href) {
            return Some(absolute.to_string());
        }
        self.base_url
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|u| u.to_string())
    }

    /// Fenced code block tagged with the language found on the block.
    pub(crate) fn code_block(&self, element: ElementRef<'_>) -> Option<String> {
        // Prefer the innermost <code> when present.
        let code_el = element
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "code");
        let target = code_el.unwrap_or(element);

        let lang = language_of(element)
            .or_else(|| code_el.and_then(language_of))
            .unwrap_or_else(|| self.default_lang.clone());

        let mut text = String::new();
        code_text(target, &mut text);
        let text = text.trim_matches('\n').trim_end();
        if text.trim().is_empty() {
            return None;
        }

        Some(format!("```{lang}\n{text}\n```"))
    }

    /// Pipe-delimited table with the header row preserved.
    fn table(&self, element: ElementRef<'_>) -> Option<String> {
        let rows: Vec<Vec<String>> = descendants_named(element, "tr")
            .into_iter()
            .map(|tr| {
                descendants_named(tr, "th")
                    .into_iter()
                    .chain(descendants_named(tr, "td"))
                    .map(|cell| self.inline_text(cell).replace('\n', " "))
                    .collect()
            })
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect();

        let (header, body) = rows.split_first()?;
        let mut out = String::new();
        out.push_str(&format!("| {} |\n", header.join(" | ")));
        out.push_str(&format!(
            "| {} |",
            header.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
        ));
        for row in body {
            out.push_str(&format!("\n| {} |", row.join(" | ")));
        }
        Some(out)
    }

    fn list(&self, element: ElementRef<'_>, ordered: bool) -> String {
        let mut items = Vec::new();
        for (i, li) in element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "li")
            .enumerate()
        {
            let text = self.inline_text(li);
            if text.is_empty() {
                continue;
            }
            if ordered {
                items.push(format!("{}. {text}", i + 1));
            } else {
                items.push(format!("- {text}"));
            }
        }
        items.join("\n")
    }
}

struct WalkState {
    blocks: Vec<String>,
    title_seen: bool,
}

/// Ensure a space boundary before appending an inline element.
fn pad(out: &mut String) {
    if let Some(last) = out.chars().last() {
        if !last.is_whitespace() {
            out.push(' ');
        }
    }
}

/// Plain text of an element with nested markup flattened.
fn plain_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Code text preserving line breaks: `<br>` becomes a newline, nested spans
/// are flattened recursively.
fn code_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(el) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.value().name() {
                    "br" => out.push('\n'),
                    "span" | "code" => code_text(el, out),
                    _ => out.push_str(&el.text().collect::<String>()),
                }
            },
            _ => {},
        }
    }
}

/// Language identifier from a `language-*` (or `lang-*`) class.
fn language_of(element: ElementRef<'_>) -> Option<String> {
    element.value().attr("class").and_then(|classes| {
        classes.split_whitespace().find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .map(str::to_string)
        })
    })
}

fn has_block_children(element: ElementRef<'_>) -> bool {
    const BLOCK_TAGS: &[&str] = &[
        "h1", "h2", "h3", "h4", "h5", "h6", "p", "pre", "table", "ul", "ol", "div", "section",
        "article", "blockquote", "figure",
    ];
    element
        .children()
        .filter_map(ElementRef::wrap)
        .any(|el| BLOCK_TAGS.contains(&el.value().name()))
}

fn descendants_named<'a>(element: ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == name)
        .collect()
}

/// Collapse excessive whitespace: runs of three or more newlines become two,
/// non-breaking spaces become plain spaces.
#[must_use]
pub fn normalize(markdown: &str) -> String {
    let replaced = markdown.replace('\u{a0}', " ");
    EXCESS_NEWLINES.replace_all(&replaced, "\n\n").trim().to_string()
}

/// Repair flattened code fences in already-markdown content.
///
/// The upstream renderer occasionally emits Pine code blocks as single
/// backtick spans across lines. Lines opening with a backtick followed by a
/// Pine entry point become a proper `pine` fence, closed at the matching
/// trailing backtick.
#[must_use]
pub fn repair_fences(markdown: &str) -> String {
    const PINE_OPENERS: &[&str] = &["//@", "indicator", "strategy", "library"];

    let mut fixed = Vec::new();
    let mut in_block = false;

    for line in markdown.lines() {
        let stripped = line.trim();

        if !in_block
            && stripped.starts_with('`')
            && !stripped.starts_with("```")
        {
            let rest = &stripped[1..];
            if PINE_OPENERS.iter().any(|p| rest.starts_with(p)) {
                in_block = true;
                fixed.push("```pine".to_string());
                fixed.push(rest.to_string());
                continue;
            }
        }

        if in_block && stripped == "`" {
            in_block = false;
            fixed.push("```".to_string());
            continue;
        }

        if in_block && stripped.ends_with('`') && !stripped.ends_with("```") {
            in_block = false;
            fixed.push(stripped[..stripped.len() - 1].to_string());
            fixed.push("```".to_string());
            continue;
        }

        fixed.push(line.to_string());
    }

    fixed.join("\n")
}
