pub mod browser;
pub mod cache;
pub mod content;
pub mod embedded;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod hash;
pub mod metadata;
pub mod noise;
pub mod parse;
pub mod pipeline;
pub mod quality;
pub mod route;
pub mod semantic;
pub mod summarizer;

pub use browser::{BrowserRenderer, HttpRenderer, RenderedPage};
pub use cache::{ContentCache, MemoryCache, SummaryRecord};
pub use content::{ExtractedContent, SourceConfidence, SourceKind};
pub use error::{BrowserFallbackError, CacheError, FetchError, Result, SummarizeError};
pub use extract::extract_content;
pub use fetch::{FetchConfig, RawDocument, fetch_url};
pub use hash::content_hash;
pub use metadata::PageMetadata;
pub use parse::Document;
pub use pipeline::{ExtractionRequest, Pipeline, PipelineConfig, SummaryResult};
pub use quality::{Band, QualityScore, ScoreFactors, score_content};
pub use route::{Decision, ReliableDomains, decide, decide_post_fallback};
pub use summarizer::{SummaryRequest, SummaryResponse, Summarizer, TARGET_LOCALE};
