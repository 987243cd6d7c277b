//! Summarization service boundary.
//!
//! The natural-language summarization call is external to this core;
//! the pipeline's job ends at producing the extracted text and
//! metadata. The product mandates a single output locale, so the
//! request pins it rather than exposing a knob per call.

use async_trait::async_trait;

use crate::content::SourceConfidence;
use crate::error::SummarizeError;
use crate::metadata::PageMetadata;

/// The single supported output locale.
pub const TARGET_LOCALE: &str = "zh-TW";

/// Extracted text above this length is truncated before handoff.
pub const MAX_SUMMARIZER_CHARS: usize = 30_000;

/// Request handed to the summarization service.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SummaryRequest {
    pub extracted_text: String,
    pub title: Option<String>,
    pub metadata: PageMetadata,
    pub source_confidence: SourceConfidence,
    /// Set on the cautious route: content is real but thin, and the
    /// summary should hedge accordingly.
    pub cautious: bool,
    pub target_locale: String,
}

/// Response from the summarization service.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SummaryResponse {
    pub summary_text: String,
}

/// Summarization boundary. Implementations wrap the external
/// language-model service; failures surface as
/// [`SummarizeError::Summarizer`].
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse, SummarizeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_locale_and_confidence() {
        let request = SummaryRequest {
            extracted_text: "body".to_string(),
            title: Some("Title".to_string()),
            metadata: PageMetadata::default(),
            source_confidence: SourceConfidence::High,
            cautious: false,
            target_locale: TARGET_LOCALE.to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["target_locale"], "zh-TW");
        assert_eq!(json["source_confidence"], "high");
    }
}
