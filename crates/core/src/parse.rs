//! Best-effort HTML parsing.
//!
//! Wraps `scraper` with the small query surface the extraction layers
//! need. Parsing is tolerant by construction: malformed markup yields a
//! best-effort tree, and an invalid selector yields an empty selection
//! instead of an error, so no extraction layer can fail on bad input.

use scraper::{Html, Selector};

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string. Never fails: malformed markup is
    /// repaired into whatever tree the parser can recover.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements matching a CSS selector, in document order.
    pub fn select(&'_ self, selector: &str) -> Vec<Element<'_>> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.html.select(&sel).map(|element| Element { element }).collect()
    }

    /// Content of the `<title>` element, trimmed, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        let el = self.select("title").into_iter().next()?;
        let title = el.block_text();
        if title.is_empty() { None } else { Some(title) }
    }
}

/// A single element in the document tree.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Concatenated text of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Text content with each text node trimmed and joined by newlines,
    /// preserving block boundaries for paragraph-structure scoring.
    pub fn block_text(&self) -> String {
        self.element
            .text()
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }
}
