//! Layer 3: deterministic content quality scoring.
//!
//! A pure function over the extraction result. No model judgment, no
//! network: the same input always produces the same score, which keeps
//! the escalation decision auditable and reproducible. Sub-scores sum
//! toward a 0-100 band:
//!
//! - word count, saturating at 40 points
//! - paragraph structure, up to 20
//! - source confidence, up to 25
//! - metadata completeness, up to 15
//! - negative signals (template residue, loading shells, repeated
//!   lines), up to -30, applied last

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::content::{ExtractedContent, SourceConfidence};

/// Scores at or above this band are summarized directly.
pub const SUFFICIENT_THRESHOLD: u8 = 40;

/// Scores below this band are unprocessable without rendering.
pub const UNPROCESSABLE_THRESHOLD: u8 = 15;

/// Window of body text scanned for negative signals.
const NEGATIVE_SCAN_CHARS: usize = 3000;

/// Minimum line length considered when counting repeated lines.
const REPEAT_LINE_CHARS: usize = 15;

fn negative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(loading\.{2,}|please wait|javascript (is )?required|enable javascript|\{\{[\w.]+\}\}|<%[^%]+%>|\{%[^%]+%\}|\[object object\])",
        )
        .unwrap()
    })
}

/// The discretized sufficiency band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Good enough to summarize directly.
    Sufficient,
    /// Real but thin content; usable only from a trusted source.
    Insufficient,
    /// Effectively empty or template residue.
    Unprocessable,
}

/// Per-factor breakdown of a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreFactors {
    pub length_score: u8,
    pub structure_score: u8,
    pub confidence_score: u8,
    pub metadata_score: u8,
    /// Non-positive; subtracted after the positive factors.
    pub penalty: i8,
}

/// A computed quality score, always clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityScore {
    pub value: u8,
    pub factors: ScoreFactors,
}

impl QualityScore {
    /// A forced zero score, used when the fetch itself failed.
    pub fn zero() -> Self {
        Self {
            value: 0,
            factors: ScoreFactors {
                length_score: 0,
                structure_score: 0,
                confidence_score: 0,
                metadata_score: 0,
                penalty: 0,
            },
        }
    }

    /// Maps the value onto the contractual sufficiency bands.
    pub fn band(&self) -> Band {
        if self.value >= SUFFICIENT_THRESHOLD {
            Band::Sufficient
        } else if self.value >= UNPROCESSABLE_THRESHOLD {
            Band::Insufficient
        } else {
            Band::Unprocessable
        }
    }
}

/// Scores an extraction result.
pub fn score_content(content: &ExtractedContent) -> QualityScore {
    let text = &content.body_text;

    let factors = ScoreFactors {
        length_score: length_score(text),
        structure_score: structure_score(text),
        confidence_score: confidence_score(content),
        metadata_score: metadata_score(content),
        penalty: penalty(text),
    };

    let total = i32::from(factors.length_score)
        + i32::from(factors.structure_score)
        + i32::from(factors.confidence_score)
        + i32::from(factors.metadata_score)
        + i32::from(factors.penalty);
    let value = total.clamp(0, 100) as u8;

    QualityScore { value, factors }
}

/// Word count, saturating at 500 words.
fn length_score(text: &str) -> u8 {
    match text.split_whitespace().count() {
        n if n >= 500 => 40,
        n if n >= 200 => 30,
        n if n >= 100 => 20,
        n if n >= 50 => 10,
        _ => 0,
    }
}

/// Rewards prose-like segmentation; a single giant blob or a near-empty
/// body earns little.
fn structure_score(text: &str) -> u8 {
    let paragraphs = text
        .lines()
        .filter(|line| line.trim().chars().count() >= 30)
        .count();
    match paragraphs {
        n if n >= 5 => 20,
        n if n >= 3 => 15,
        n if n >= 1 => 5,
        _ => 0,
    }
}

fn confidence_score(content: &ExtractedContent) -> u8 {
    match content.source_confidence {
        SourceConfidence::High => 25,
        SourceConfidence::Medium => 15,
        SourceConfidence::Low => {
            if content.is_empty() {
                0
            } else {
                5
            }
        }
    }
}

fn metadata_score(content: &ExtractedContent) -> u8 {
    let meta = &content.metadata;
    let mut score = 0;
    if content.title.is_some() || meta.best_title().is_some() {
        score += 5;
    }
    if meta.has_description() {
        score += 5;
    }
    if meta.has_attribution() {
        score += 5;
    }
    score
}

/// Detects templated and placeholder artifacts in the leading window of
/// the body: loading shells, "enable JavaScript" notices, unrendered
/// template expressions, and near-duplicate repeated lines. Each hit
/// costs 10 points, floored at -30.
fn penalty(text: &str) -> i8 {
    let window: String = text.chars().take(NEGATIVE_SCAN_CHARS).collect();

    let mut hits = negative_pattern().find_iter(&window).count();

    let mut line_counts: HashMap<&str, usize> = HashMap::new();
    for line in window.lines() {
        let line = line.trim();
        if line.chars().count() >= REPEAT_LINE_CHARS {
            *line_counts.entry(line).or_insert(0) += 1;
        }
    }
    hits += line_counts.values().filter(|&&count| count >= 3).count();

    -((hits * 10).min(30) as i8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SourceKind;
    use crate::metadata::PageMetadata;

    fn content(body: &str, kind: SourceKind, confidence: SourceConfidence) -> ExtractedContent {
        ExtractedContent {
            title: Some("Title".to_string()),
            body_text: body.to_string(),
            metadata: PageMetadata { title: Some("Title".to_string()), ..PageMetadata::default() },
            source_kind: kind,
            source_confidence: confidence,
        }
    }

    fn prose(paragraphs: usize, words_per_paragraph: usize) -> String {
        (0..paragraphs)
            .map(|i| {
                std::iter::repeat_n(format!("word{i}"), words_per_paragraph)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_rich_article_is_sufficient() {
        let mut c = content(&prose(6, 100), SourceKind::SemanticHtml, SourceConfidence::Medium);
        c.metadata.description = Some("desc".to_string());
        c.metadata.author = Some("author".to_string());
        let score = score_content(&c);
        // 40 words + 20 structure + 15 confidence + 15 metadata
        assert_eq!(score.value, 90);
        assert_eq!(score.band(), Band::Sufficient);
    }

    #[test]
    fn test_structured_source_is_sufficient_without_metadata() {
        let mut c = content(&prose(5, 120), SourceKind::SsrNext, SourceConfidence::High);
        c.title = None;
        c.metadata = PageMetadata::default();
        let score = score_content(&c);
        assert_eq!(score.factors.confidence_score, 25);
        assert_eq!(score.band(), Band::Sufficient);
    }

    #[test]
    fn test_empty_body_is_unprocessable() {
        let c = ExtractedContent::empty(PageMetadata::default());
        let score = score_content(&c);
        assert_eq!(score.value, 0);
        assert_eq!(score.band(), Band::Unprocessable);
    }

    #[test]
    fn test_spa_shell_penalized_below_band() {
        let body = "Loading...\nPlease wait\nPlease enable JavaScript to continue.";
        let c = content(body, SourceKind::None, SourceConfidence::Low);
        let score = score_content(&c);
        assert!(score.factors.penalty <= -20);
        assert_eq!(score.band(), Band::Unprocessable);
    }

    #[test]
    fn test_penalty_cannot_push_below_zero() {
        let body = "Loading... please wait {{item.title}} [object Object] <% broken %>";
        let c = content(body, SourceKind::None, SourceConfidence::Low);
        let score = score_content(&c);
        assert_eq!(score.factors.penalty, -30);
        assert!(score.value <= 100);
        // u8 already proves the lower bound, assert the clamp arithmetic anyway
        assert_eq!(score.value.min(100), score.value);
    }

    #[test]
    fn test_repeated_lines_penalized() {
        let repeated = "Subscribe to our newsletter today\n".repeat(4);
        let c = content(&repeated, SourceKind::SemanticHtml, SourceConfidence::Medium);
        let score = score_content(&c);
        assert!(score.factors.penalty <= -10);
    }

    #[test]
    fn test_single_blob_scores_less_than_paragraphs() {
        let blob = prose(1, 500);
        let split = prose(5, 100);
        let blob_score = score_content(&content(&blob, SourceKind::SemanticHtml, SourceConfidence::Medium));
        let split_score = score_content(&content(&split, SourceKind::SemanticHtml, SourceConfidence::Medium));
        assert!(split_score.value > blob_score.value);
    }

    #[test]
    fn test_word_count_saturates() {
        let short = score_content(&content(&prose(5, 100), SourceKind::SemanticHtml, SourceConfidence::Medium));
        let long = score_content(&content(&prose(5, 400), SourceKind::SemanticHtml, SourceConfidence::Medium));
        assert_eq!(short.factors.length_score, long.factors.length_score);
    }

    #[test]
    fn test_band_boundaries() {
        let mk = |value| QualityScore { value, ..QualityScore::zero() };
        assert_eq!(mk(40).band(), Band::Sufficient);
        assert_eq!(mk(39).band(), Band::Insufficient);
        assert_eq!(mk(15).band(), Band::Insufficient);
        assert_eq!(mk(14).band(), Band::Unprocessable);
        assert_eq!(mk(0).band(), Band::Unprocessable);
        assert_eq!(mk(100).band(), Band::Sufficient);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let c = content(&prose(4, 80), SourceKind::JsonLd, SourceConfidence::High);
        assert_eq!(score_content(&c), score_content(&c));
    }
}
