//! Page-level metadata harvesting.
//!
//! Metadata is collected independently of the content region: even when
//! body extraction fails outright, the title and Open Graph fields are
//! often still present and feed the quality scorer's completeness
//! factor.

use std::collections::BTreeMap;

use crate::parse::Document;

/// Metadata harvested from `<title>`, standard meta tags, and Open
/// Graph properties.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageMetadata {
    /// Content of the `<title>` element.
    pub title: Option<String>,
    /// `<meta name="description">`.
    pub description: Option<String>,
    /// `<meta name="author">`.
    pub author: Option<String>,
    /// `article:published_time` or equivalent publish-date hints.
    pub published_at: Option<String>,
    /// All `og:*` properties, keyed without the `og:` prefix.
    pub og_fields: BTreeMap<String, String>,
}

impl PageMetadata {
    /// Harvests metadata from a parsed document.
    pub fn from_document(doc: &Document) -> Self {
        let mut meta = Self { title: doc.title(), ..Self::default() };

        for tag in doc.select("meta") {
            let Some(content) = tag.attr("content") else { continue };
            let content = content.trim();
            if content.is_empty() {
                continue;
            }

            let name = tag
                .attr("name")
                .or_else(|| tag.attr("property"))
                .unwrap_or_default()
                .to_lowercase();

            if let Some(og_key) = name.strip_prefix("og:") {
                meta.og_fields
                    .entry(og_key.to_string())
                    .or_insert_with(|| content.to_string());
                continue;
            }

            match name.as_str() {
                "description" => meta.description.get_or_insert_with(|| content.to_string()),
                "author" => meta.author.get_or_insert_with(|| content.to_string()),
                "article:published_time" | "pubdate" | "publishdate" => {
                    meta.published_at.get_or_insert_with(|| content.to_string())
                }
                _ => continue,
            };
        }

        meta
    }

    /// Value of an `og:*` property, by key without the prefix.
    pub fn og(&self, key: &str) -> Option<&str> {
        self.og_fields.get(key).map(String::as_str)
    }

    /// Best available title: `og:title` wins over the `<title>` element,
    /// which tends to carry site-name suffixes.
    pub fn best_title(&self) -> Option<&str> {
        self.og("title").or(self.title.as_deref())
    }

    /// Whether any description-like field is populated.
    pub fn has_description(&self) -> bool {
        self.description.is_some() || self.og("description").is_some()
    }

    /// Whether any authorship or publish-date hint is populated.
    pub fn has_attribution(&self) -> bool {
        self.author.is_some() || self.published_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Plain Title - Some Site</title>
            <meta name="description" content="A standard description.">
            <meta name="author" content="John Doe">
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG Description">
            <meta property="og:site_name" content="Some Site">
            <meta property="article:published_time" content="2024-01-15T10:30:00Z">
        </head>
        <body></body>
        </html>
    "#;

    #[test]
    fn test_harvest_all_fields() {
        let doc = Document::parse(HTML_WITH_META);
        let meta = PageMetadata::from_document(&doc);

        assert_eq!(meta.title.as_deref(), Some("Plain Title - Some Site"));
        assert_eq!(meta.description.as_deref(), Some("A standard description."));
        assert_eq!(meta.author.as_deref(), Some("John Doe"));
        assert_eq!(meta.published_at.as_deref(), Some("2024-01-15T10:30:00Z"));
        assert_eq!(meta.og("title"), Some("OG Title"));
        assert_eq!(meta.og("site_name"), Some("Some Site"));
    }

    #[test]
    fn test_best_title_prefers_og() {
        let doc = Document::parse(HTML_WITH_META);
        let meta = PageMetadata::from_document(&doc);
        assert_eq!(meta.best_title(), Some("OG Title"));
    }

    #[test]
    fn test_best_title_falls_back_to_title_element() {
        let doc = Document::parse("<html><head><title>Only Title</title></head><body></body></html>");
        let meta = PageMetadata::from_document(&doc);
        assert_eq!(meta.best_title(), Some("Only Title"));
    }

    #[test]
    fn test_empty_content_attributes_ignored() {
        let html = r#"<html><head><meta name="description" content="  "></head><body></body></html>"#;
        let meta = PageMetadata::from_document(&Document::parse(html));
        assert!(meta.description.is_none());
        assert!(!meta.has_description());
    }

    #[test]
    fn test_first_value_wins_for_duplicates() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="First">
                <meta property="og:title" content="Second">
            </head><body></body></html>
        "#;
        let meta = PageMetadata::from_document(&Document::parse(html));
        assert_eq!(meta.og("title"), Some("First"));
    }

    #[test]
    fn test_attribution_from_pubdate_alone() {
        let html = r#"<html><head><meta name="pubdate" content="2023-06-01"></head><body></body></html>"#;
        let meta = PageMetadata::from_document(&Document::parse(html));
        assert!(meta.has_attribution());
        assert!(meta.author.is_none());
    }
}
