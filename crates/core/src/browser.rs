//! Headless-browser fallback boundary.
//!
//! Full page rendering is the single most expensive operation in the
//! system (60-90s against the fetcher's 10), so it lives behind its own
//! invocation boundary with its own timeout and failure domain. The
//! pipeline talks to it through [`BrowserRenderer`]; the shipped
//! implementation calls an external render service over JSON, the way
//! the rest of the system treats every costly collaborator.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::content::{ExtractedContent, SourceKind};
use crate::error::BrowserFallbackError;
use crate::metadata::PageMetadata;

/// Extra headroom on the HTTP call so the service's own budget expires
/// first and its error report wins over a bare client timeout.
const CLIENT_GRACE_SECS: u64 = 5;

/// Text content produced by a full render of the page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub title: Option<String>,
    pub extracted_text: String,
    /// Metadata fields the renderer observed (Open Graph and similar).
    pub metadata: BTreeMap<String, String>,
    pub elapsed_seconds: f64,
}

impl RenderedPage {
    /// Folds the rendered output into an extraction result, merging the
    /// renderer's metadata over what the static fetch already
    /// harvested. An empty render degrades to an empty result rather
    /// than claiming browser-rendered confidence for nothing.
    pub fn into_content(self, mut metadata: PageMetadata) -> ExtractedContent {
        for (key, value) in self.metadata {
            metadata.og_fields.entry(key).or_insert(value);
        }

        if self.extracted_text.trim().is_empty() {
            return ExtractedContent::empty(metadata);
        }

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| metadata.best_title().map(str::to_string));
        ExtractedContent {
            title,
            body_text: self.extracted_text,
            metadata,
            source_kind: SourceKind::BrowserRendered,
            source_confidence: SourceKind::BrowserRendered.confidence(),
        }
    }
}

/// The render boundary. One attempt per request; the budget is a hard
/// deadline, not a retry window.
#[async_trait]
pub trait BrowserRenderer: Send + Sync {
    async fn render(&self, url: &Url, timeout_budget: Duration) -> Result<RenderedPage, BrowserFallbackError>;
}

/// Wire request to the render service.
#[derive(Debug, serde::Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
    timeout_budget_seconds: u64,
}

/// Wire response from the render service.
#[derive(Debug, serde::Deserialize)]
struct RenderResponse {
    success: bool,
    #[serde(default)]
    extracted_text: String,
    title: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    #[serde(default)]
    elapsed_seconds: f64,
    error: Option<String>,
}

/// Client for an HTTP render service.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    endpoint: Url,
}

impl HttpRenderer {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl BrowserRenderer for HttpRenderer {
    async fn render(&self, url: &Url, timeout_budget: Duration) -> Result<RenderedPage, BrowserFallbackError> {
        let budget_secs = timeout_budget.as_secs();
        let client = Client::builder()
            .timeout(timeout_budget + Duration::from_secs(CLIENT_GRACE_SECS))
            .build()
            .map_err(|e| BrowserFallbackError::Crash(e.to_string()))?;

        tracing::info!(%url, budget_secs, "invoking browser fallback");

        let response = client
            .post(self.endpoint.clone())
            .json(&RenderRequest { url: url.as_str(), timeout_budget_seconds: budget_secs })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrowserFallbackError::Timeout { seconds: budget_secs }
                } else {
                    BrowserFallbackError::Crash(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(BrowserFallbackError::Crash(format!("render service returned HTTP {}", response.status())));
        }

        let payload: RenderResponse = response
            .json()
            .await
            .map_err(|e| BrowserFallbackError::Crash(e.to_string()))?;

        into_rendered_page(payload, budget_secs)
    }
}

/// Maps the service response onto the fallback error taxonomy.
fn into_rendered_page(payload: RenderResponse, budget_secs: u64) -> Result<RenderedPage, BrowserFallbackError> {
    if payload.success {
        return Ok(RenderedPage {
            title: payload.title,
            extracted_text: payload.extracted_text,
            metadata: payload.metadata,
            elapsed_seconds: payload.elapsed_seconds,
        });
    }

    let error = payload.error.unwrap_or_else(|| "render failed without detail".to_string());
    let lowered = error.to_lowercase();
    if lowered.contains("timeout") || lowered.contains("timed out") {
        Err(BrowserFallbackError::Timeout { seconds: budget_secs })
    } else if lowered.contains("block") || lowered.contains("bot") || lowered.contains("challenge") || lowered.contains("captcha") {
        Err(BrowserFallbackError::Blocked)
    } else {
        Err(BrowserFallbackError::Crash(error))
    }
}
