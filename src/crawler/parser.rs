//! HTML parser for extracting page text and links
//!
//! This module handles parsing fetched bytes to extract:
//! - The page title (from `<title>`, falling back to the first `<h1>`)
//! - Body text (every non-empty `<p>`)
//! - Raw anchor targets to hand to the URL normalizer
//!
//! Non-content elements are removed from the tree before anything is read.

use scraper::{Html, Selector};

/// Elements stripped from every document before extraction
pub const UNWANTED_TAGS: &[&str] = &["style", "script", "link", "iframe", "frame", "embed"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title, empty when the page has neither `<title>` nor `<h1>`
    pub title: String,

    /// Paragraph text joined by newlines, in document order
    pub content: String,

    /// Every anchor `href`, in document order, duplicates included
    pub links: Vec<String>,
}

/// Parses raw page bytes and extracts title, text and links
///
/// Invalid UTF-8 sequences are replaced rather than rejected; the HTML
/// parser itself never fails.
///
/// # Example
///
/// ```
/// use kensaku::crawler::parse_page;
///
/// let html = br#"<html><head><title>Test</title></head><body><p>Hi</p><a href="/page">Link</a></body></html>"#;
/// let page = parse_page(html);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.content, "Hi");
/// assert_eq!(page.links, vec!["/page"]);
/// ```
pub fn parse_page(bytes: &[u8]) -> ParsedPage {
    let document = new_document(bytes);

    ParsedPage {
        title: extract_title(&document),
        content: extract_text(&document),
        links: extract_links(&document),
    }
}

/// Builds a document tree with all [`UNWANTED_TAGS`] detached
pub fn new_document(bytes: &[u8]) -> Html {
    let mut document = Html::parse_document(&String::from_utf8_lossy(bytes));

    for tag in UNWANTED_TAGS {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };

        // Ids are collected first; the tree cannot be mutated while a
        // selection borrows it.
        let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    document
}

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> String {
    first_text(document, "title")
        .or_else(|| first_text(document, "h1"))
        .unwrap_or_default()
}

fn first_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the text of every non-empty paragraph, newline-joined
pub fn extract_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the raw `href` of every anchor
pub fn extract_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
