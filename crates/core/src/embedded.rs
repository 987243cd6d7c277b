//! Layer 2: embedded structured-data extraction.
//!
//! Server-rendered pages often carry their content twice: once in the
//! markup and once in a machine-readable payload the client framework
//! hydrates from. Those payloads are cleaner than anything a DOM
//! heuristic can recover, so when one parses it strictly overrides the
//! semantic layer. Checked in priority order: Next.js hydration data,
//! Nuxt hydration data, then JSON-LD linked-data blocks.
//!
//! This layer scans the raw markup (before noise stripping, which
//! removes script tags) and never fails a request: a payload that is
//! present but malformed falls through silently.

use serde_json::Value;
use std::collections::HashSet;

use crate::content::SourceKind;
use crate::parse::Document;
use regex::Regex;
use std::sync::OnceLock;

/// Minimum harvested length for a payload to be usable.
const MIN_EMBEDDED_CHARS: usize = 100;

/// Minimum length for a single string fragment to look like content.
const MIN_FRAGMENT_CHARS: usize = 20;

/// Recursion bound for the deep text harvest.
const MAX_DEPTH: usize = 5;

/// Object keys that conventionally hold article text, tried first.
const CONTENT_KEYS: &[&str] =
    &["body", "content", "text", "description", "articleBody", "abstract", "summary", "excerpt"];

/// JSON-LD `@type` values that describe article-like pages.
const ARTICLE_TYPES: &[&str] =
    &["Article", "NewsArticle", "BlogPosting", "WebPage", "Report", "TechArticle", "ScholarlyArticle"];

fn nuxt2_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)window\.__NUXT__\s*=\s*(\{.+\})\s*;?\s*$").unwrap())
}

/// A structured-data payload harvested from the raw markup.
#[derive(Debug, Clone)]
pub struct EmbeddedPayload {
    /// Title declared by the payload, when the schema carries one.
    pub title: Option<String>,
    /// Harvested body text, newline-separated by fragment.
    pub body_text: String,
    /// Which payload family produced it.
    pub kind: SourceKind,
}

/// Scans the raw document for embedded structured data.
pub fn extract_embedded(doc: &Document) -> Option<EmbeddedPayload> {
    if let Some(payload) = extract_next_data(doc) {
        return Some(payload);
    }
    if let Some(payload) = extract_nuxt_data(doc) {
        return Some(payload);
    }
    extract_json_ld(doc)
}

/// Next.js: `<script id="__NEXT_DATA__">` holding `props.pageProps`.
fn extract_next_data(doc: &Document) -> Option<EmbeddedPayload> {
    let script = doc.select(r#"script[id="__NEXT_DATA__"]"#).into_iter().next()?;
    let data: Value = serde_json::from_str(&script.text()).ok()?;
    let page_props = data.get("props")?.get("pageProps")?;

    let body_text = deep_extract_text(page_props);
    if body_text.chars().count() >= MIN_EMBEDDED_CHARS {
        tracing::debug!(chars = body_text.chars().count(), "extracted Next.js hydration payload");
        Some(EmbeddedPayload { title: None, body_text, kind: SourceKind::SsrNext })
    } else {
        None
    }
}

/// Nuxt: `<script id="__NUXT_DATA__">` (Nuxt 3) or a
/// `window.__NUXT__ = {...}` assignment (Nuxt 2).
fn extract_nuxt_data(doc: &Document) -> Option<EmbeddedPayload> {
    if let Some(script) = doc.select(r#"script[id="__NUXT_DATA__"]"#).into_iter().next()
        && let Ok(data) = serde_json::from_str::<Value>(&script.text())
    {
        let body_text = deep_extract_text(&data);
        if body_text.chars().count() >= MIN_EMBEDDED_CHARS {
            return Some(EmbeddedPayload { title: None, body_text, kind: SourceKind::SsrNuxt });
        }
    }

    for script in doc.select("script") {
        let source = script.text();
        if !source.contains("__NUXT__") {
            continue;
        }
        if let Some(captures) = nuxt2_pattern().captures(&source)
            && let Ok(data) = serde_json::from_str::<Value>(&captures[1])
        {
            let body_text = deep_extract_text(&data);
            if body_text.chars().count() >= MIN_EMBEDDED_CHARS {
                return Some(EmbeddedPayload { title: None, body_text, kind: SourceKind::SsrNuxt });
            }
        }
    }

    None
}

/// JSON-LD: `<script type="application/ld+json">` blocks with an
/// article-like `@type`, preferring the declared `articleBody`.
fn extract_json_ld(doc: &Document) -> Option<EmbeddedPayload> {
    for script in doc.select(r#"script[type="application/ld+json"]"#) {
        let Ok(data) = serde_json::from_str::<Value>(&script.text()) else {
            continue;
        };

        let items: Vec<&Value> = match &data {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for item in items {
            let Some(object) = item.as_object() else { continue };
            if !is_article_type(object.get("@type")) {
                continue;
            }

            let title = object
                .get("headline")
                .and_then(Value::as_str)
                .map(str::to_string);

            let declared_body = ["articleBody", "text"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_str))
                .filter(|body| body.chars().count() >= MIN_EMBEDDED_CHARS);
            if let Some(body) = declared_body {
                return Some(EmbeddedPayload { title, body_text: body.to_string(), kind: SourceKind::JsonLd });
            }

            let body_text = deep_extract_text(item);
            if body_text.chars().count() >= MIN_EMBEDDED_CHARS {
                return Some(EmbeddedPayload { title, body_text, kind: SourceKind::JsonLd });
            }
        }
    }

    None
}

fn is_article_type(type_field: Option<&Value>) -> bool {
    let declared = match type_field {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => return false,
    };
    ARTICLE_TYPES.iter().any(|t| declared.contains(t))
}

/// Recursively harvests content-looking strings from a JSON value.
///
/// Known content keys are collected first; other values are walked to a
/// bounded depth. Strings shorter than the fragment floor, or shaped
/// like URLs and paths, are skipped.
fn deep_extract_text(value: &Value) -> String {
    let mut fragments = Vec::new();
    collect_fragments(value, MAX_DEPTH, &mut fragments);
    fragments.join("\n")
}

fn collect_fragments(value: &Value, depth: usize, out: &mut Vec<String>) {
    if depth == 0 {
        return;
    }
    match value {
        Value::String(s) => {
            if is_content_fragment(s) {
                out.push(s.clone());
            }
        }
        Value::Object(map) => {
            let mut consumed: HashSet<&str> = HashSet::new();
            for key in CONTENT_KEYS {
                if let Some(Value::String(s)) = map.get(*key)
                    && s.chars().count() >= MIN_FRAGMENT_CHARS
                {
                    out.push(s.clone());
                    consumed.insert(*key);
                }
            }
            for (key, nested) in map {
                if !consumed.contains(key.as_str()) {
                    collect_fragments(nested, depth - 1, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_fragments(item, depth - 1, out);
            }
        }
        _ => {}
    }
}

fn is_content_fragment(s: &str) -> bool {
    s.chars().count() >= MIN_FRAGMENT_CHARS
        && !s.starts_with("http://")
        && !s.starts_with("https://")
        && !s.starts_with("data:")
        && !s.starts_with('/')
}
