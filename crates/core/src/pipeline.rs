//! End-to-end request orchestration.
//!
//! One request flows fetch → extract → score → route, with at most one
//! browser-fallback escalation. All state is request-scoped; the
//! content cache is the only shared resource, and it is consulted
//! read-before-fetch (by URL) and written after success (by content
//! hash). Both suspension points, the fetch and the render, carry
//! hard deadlines enforced here as well as inside the call.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use url::Url;

use crate::browser::BrowserRenderer;
use crate::cache::{ContentCache, SummaryRecord};
use crate::content::ExtractedContent;
use crate::error::{BrowserFallbackError, Result, SummarizeError};
use crate::extract::extract_content;
use crate::fetch::{self, FetchConfig};
use crate::hash::content_hash;
use crate::metadata::PageMetadata;
use crate::quality::{QualityScore, score_content};
use crate::route::{Decision, ReliableDomains, decide, decide_post_fallback};
use crate::summarizer::{MAX_SUMMARIZER_CHARS, SummaryRequest, Summarizer, TARGET_LOCALE};

/// Characters of raw content kept alongside the summary for follow-up
/// questions.
const SNAPSHOT_CHARS: usize = 10_000;

/// Headroom past the render budget before the pipeline gives up on the
/// renderer entirely.
const RENDER_GUARD_SECS: u64 = 10;

/// A URL surfaced in a conversational message.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub url: String,
    pub conversation_scope_id: String,
    pub triggering_message_id: String,
}

/// The artifact handed across the boundary for persistence and reply.
/// Never mutated once emitted.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub title: Option<String>,
    pub summary_text: String,
    pub raw_content_snapshot: String,
    pub content_hash: String,
    pub produced_at: OffsetDateTime,
}

impl From<SummaryRecord> for SummaryResult {
    fn from(record: SummaryRecord) -> Self {
        Self {
            title: record.title,
            summary_text: record.summary_text,
            raw_content_snapshot: record.raw_content_snapshot,
            content_hash: record.content_hash,
            produced_at: record.created_at,
        }
    }
}

/// Pipeline-wide settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub reliable_domains: ReliableDomains,
    /// Budget handed to the browser fallback.
    pub browser_budget: Duration,
    pub target_locale: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            reliable_domains: ReliableDomains::default(),
            browser_budget: Duration::from_secs(90),
            target_locale: TARGET_LOCALE.to_string(),
        }
    }
}

/// The content acquisition and quality-routing pipeline.
///
/// Stateless across requests: a single instance can serve concurrent
/// callers, with the cache as the only shared (write-once) resource.
pub struct Pipeline {
    config: PipelineConfig,
    renderer: Arc<dyn BrowserRenderer>,
    summarizer: Arc<dyn Summarizer>,
    cache: Arc<dyn ContentCache>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig, renderer: Arc<dyn BrowserRenderer>, summarizer: Arc<dyn Summarizer>,
        cache: Arc<dyn ContentCache>,
    ) -> Self {
        Self { config, renderer, summarizer, cache }
    }

    /// Processes one request end to end.
    pub async fn process(&self, request: &ExtractionRequest) -> Result<SummaryResult> {
        if let Some(record) = self.cached_by_url(request).await {
            tracing::info!(url = %request.url, "serving summary from cache");
            return Ok(record.into());
        }

        let parsed_url =
            fetch::parse_url(&request.url).map_err(|e| SummarizeError::InvalidUrl(e.to_string()))?;
        let reliable = self.config.reliable_domains.is_reliable(&parsed_url);

        let (content, score) = match fetch::fetch_url(&request.url, &self.config.fetch).await {
            Ok(document) => {
                let content = extract_content(&document.body);
                let score = score_content(&content);
                (content, score)
            }
            Err(err) => {
                tracing::warn!(url = %parsed_url, %err, "fetch failed, scoring as zero");
                (ExtractedContent::empty(PageMetadata::default()), QualityScore::zero())
            }
        };

        if !content.is_empty()
            && let Some(record) = self.cached_by_hash(&content_hash(&content.body_text)).await
        {
            tracing::info!(url = %request.url, "content hash already summarized");
            // Re-key the existing summary under this conversation and URL
            // so follow-up lookups hit without recomputing.
            let record = SummaryRecord {
                url: request.url.clone(),
                conversation_scope_id: request.conversation_scope_id.clone(),
                ..record
            };
            if let Err(err) = self.cache.insert(record.clone()).await {
                tracing::debug!(%err, "cache write failed, continuing");
            }
            return Ok(record.into());
        }

        let decision = decide(score.band(), reliable);
        tracing::info!(
            url = %parsed_url,
            score = score.value,
            band = ?score.band(),
            reliable,
            ?decision,
            "routed extraction"
        );

        match decision {
            Decision::DirectSummarize => self.summarize_and_store(request, content, false).await,
            Decision::CautiousSummarize => self.summarize_and_store(request, content, true).await,
            Decision::BrowserFallback => self.run_fallback(request, &parsed_url, reliable, content).await,
            Decision::FailExplicit => Err(SummarizeError::InsufficientContent { score: score.value }),
        }
    }

    /// Exactly one render attempt, re-scored and re-routed with further
    /// escalation disallowed.
    async fn run_fallback(
        &self, request: &ExtractionRequest, url: &Url, reliable: bool, prior: ExtractedContent,
    ) -> Result<SummaryResult> {
        let budget = self.config.browser_budget;
        let guard = budget + Duration::from_secs(RENDER_GUARD_SECS);
        let rendered = tokio::time::timeout(guard, self.renderer.render(url, budget))
            .await
            .map_err(|_| BrowserFallbackError::Timeout { seconds: guard.as_secs() })??;

        let content = rendered.into_content(prior.metadata);
        let score = score_content(&content);
        let decision = decide_post_fallback(score.band(), reliable);
        tracing::info!(%url, score = score.value, band = ?score.band(), ?decision, "re-routed after fallback");

        match decision {
            Decision::DirectSummarize => self.summarize_and_store(request, content, false).await,
            Decision::CautiousSummarize => self.summarize_and_store(request, content, true).await,
            Decision::BrowserFallback | Decision::FailExplicit => {
                Err(SummarizeError::InsufficientContent { score: score.value })
            }
        }
    }

    async fn summarize_and_store(
        &self, request: &ExtractionRequest, content: ExtractedContent, cautious: bool,
    ) -> Result<SummaryResult> {
        let response = self
            .summarizer
            .summarize(SummaryRequest {
                extracted_text: truncate_chars(&content.body_text, MAX_SUMMARIZER_CHARS),
                title: content.title.clone(),
                metadata: content.metadata.clone(),
                source_confidence: content.source_confidence,
                cautious,
                target_locale: self.config.target_locale.clone(),
            })
            .await?;

        let result = SummaryResult {
            title: content.title,
            summary_text: response.summary_text,
            raw_content_snapshot: truncate_chars(&content.body_text, SNAPSHOT_CHARS),
            content_hash: content_hash(&content.body_text),
            produced_at: OffsetDateTime::now_utc(),
        };

        let record = SummaryRecord {
            url: request.url.clone(),
            title: result.title.clone(),
            summary_text: result.summary_text.clone(),
            raw_content_snapshot: result.raw_content_snapshot.clone(),
            content_hash: result.content_hash.clone(),
            conversation_scope_id: request.conversation_scope_id.clone(),
            created_at: result.produced_at,
        };
        if let Err(err) = self.cache.insert(record).await {
            tracing::debug!(%err, "cache write failed, continuing");
        }

        Ok(result)
    }

    async fn cached_by_url(&self, request: &ExtractionRequest) -> Option<SummaryRecord> {
        match self.cache.get_by_url(&request.conversation_scope_id, &request.url).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::debug!(%err, "cache read failed, recomputing");
                None
            }
        }
    }

    async fn cached_by_hash(&self, hash: &str) -> Option<SummaryRecord> {
        match self.cache.get_by_hash(hash).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::debug!(%err, "cache read failed, recomputing");
                None
            }
        }
    }
}

/// Truncates at a character boundary.
fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
