//! Layer 1: semantic HTML extraction.
//!
//! Locates the primary-content region by priority-ordered structural
//! signals: explicit `<article>`/`<main>` containers, the ARIA main
//! landmark, then id/class naming conventions. The document must
//! already be noise-stripped (see [`crate::noise`]) so that the
//! candidate region is measured without chrome. A whole-body fallback
//! catches pages with no structural container at all, at low
//! confidence.

use regex::Regex;
use std::sync::OnceLock;

use crate::content::SourceConfidence;
use crate::parse::Document;

/// Minimum text length for a structural container to count.
const MIN_CONTAINER_CHARS: usize = 100;

/// Minimum text length for the body fallback to count.
const MIN_BODY_CHARS: usize = 50;

/// Structural containers tried first, in priority order.
const CONTAINER_SELECTORS: &[&str] = &["article", "main", r#"[role="main"]"#];

fn content_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^(content|article|post|entry|story)").unwrap())
}

fn content_class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(article|post|entry|story|content)[-_]?(body|text|content)?").unwrap())
}

/// A primary-content candidate found by structural signals.
#[derive(Debug, Clone)]
pub struct SemanticCandidate {
    /// Block-separated text of the candidate region.
    pub body_text: String,
    /// Medium for a structural container, Low for the body fallback.
    pub confidence: SourceConfidence,
}

/// Extracts the primary-content region from a noise-stripped document.
///
/// Returns `None` when no region yields enough text, which the caller
/// records as an empty extraction rather than an error.
pub fn extract_semantic(doc: &Document) -> Option<SemanticCandidate> {
    for selector in CONTAINER_SELECTORS {
        if let Some(candidate) = accept_container(doc.select(selector).into_iter().next()) {
            return Some(candidate);
        }
    }

    let by_id = doc
        .select("[id]")
        .into_iter()
        .find(|el| el.attr("id").is_some_and(|id| content_id_pattern().is_match(id)));
    if let Some(candidate) = accept_container(by_id) {
        return Some(candidate);
    }

    let by_class = doc
        .select("[class]")
        .into_iter()
        .find(|el| el.attr("class").is_some_and(|class| content_class_pattern().is_match(class)));
    if let Some(candidate) = accept_container(by_class) {
        return Some(candidate);
    }

    let body = doc.select("body").into_iter().next()?;
    let body_text = body.block_text();
    if body_text.chars().count() >= MIN_BODY_CHARS {
        tracing::debug!(chars = body_text.chars().count(), "no structural container, using body fallback");
        return Some(SemanticCandidate { body_text, confidence: SourceConfidence::Low });
    }

    None
}

fn accept_container(element: Option<crate::parse::Element<'_>>) -> Option<SemanticCandidate> {
    let body_text = element?.block_text();
    if body_text.chars().count() >= MIN_CONTAINER_CHARS {
        Some(SemanticCandidate { body_text, confidence: SourceConfidence::Medium })
    } else {
        None
    }
}
