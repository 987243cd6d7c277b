//! Chrome and noise removal.
//!
//! A streaming rewrite pass that drops navigation, boilerplate, and
//! script-like regions from markup before the semantic layer measures a
//! candidate container. The embedded-data layer runs on the raw markup,
//! so script payloads must be harvested before this pass.

use regex::Regex;
use std::sync::OnceLock;

/// Tags that never hold primary content.
const NOISE_TAGS: &[&str] =
    &["script", "style", "noscript", "iframe", "svg", "canvas", "nav", "footer", "header", "aside"];

/// ARIA landmark roles for page chrome.
const NOISE_ROLES: &[&str] = &["navigation", "banner", "contentinfo", "complementary"];

fn noise_class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(sidebar|menu|nav|footer|header|ads?|advert|banner|cookie|popup|modal|comment|share|social|related|recommend)",
        )
        .unwrap()
    })
}

/// Removes noise regions from HTML: known chrome tags, ARIA landmark
/// roles, and elements whose class list matches boilerplate patterns.
///
/// On any rewriter failure the input is returned unchanged; a noisy
/// document still scores better than a lost one.
pub fn strip_noise(html: &str) -> String {
    let mut handlers = Vec::new();
    for tag in NOISE_TAGS {
        handlers.push(lol_html::element!(*tag, |el| {
            el.remove();
            Ok(())
        }));
    }
    handlers.push(lol_html::element!("*", |el| {
        if let Some(role) = el.get_attribute("role")
            && NOISE_ROLES.contains(&role.to_lowercase().as_str())
        {
            el.remove();
            return Ok(());
        }

        if let Some(class) = el.get_attribute("class")
            && noise_class_pattern().is_match(&class)
        {
            el.remove();
        }

        Ok(())
    }));

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings { element_content_handlers: handlers, ..Default::default() },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    match rewriter.write(html.as_bytes()) {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    match rewriter.end() {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    if output.is_empty() { html.to_string() } else { output }
}
