//! Error types for the extraction and summarization pipeline.
//!
//! Errors are split along the pipeline's failure domains: [`FetchError`]
//! for the bounded-time HTTP retrieval, [`BrowserFallbackError`] for the
//! headless-render boundary, [`CacheError`] for the content cache, and
//! [`SummarizeError`] as the terminal error handed back to the caller.
//!
//! Parse failures are deliberately absent: malformed markup always
//! degrades to an empty extraction and is scored as such, never raised.

use thiserror::Error;

/// Errors from the single-attempt HTTP fetch.
///
/// A fetch error never aborts the request on its own. The pipeline
/// treats it as a zero-score extraction and routes through the decision
/// table, which may still escalate to the browser fallback.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request exceeded the configured deadline.
    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The host name could not be resolved.
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// TLS negotiation with the server failed.
    #[error("TLS handshake failed: {0}")]
    Tls(String),

    /// Connection-level failure that is neither DNS nor TLS.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The redirect chain cycled or exceeded the hop limit.
    #[error("redirect chain exceeded {limit} hops")]
    RedirectLoop { limit: usize },

    /// The response body exceeded the configured size cap.
    #[error("response body exceeded {limit} bytes")]
    TooLarge { limit: usize },

    /// The URL could not be parsed or lacks an http(s) scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response is not a document type we extract from
    /// (binary downloads, media, archives).
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    /// Any other transport-level failure from the HTTP client.
    #[error("HTTP request failed: {0}")]
    Transport(String),
}

/// Errors from the headless-browser render boundary.
///
/// These are terminal: the fallback is the last escalation step, so a
/// failure here surfaces to the caller as an explicit
/// "cannot extract this page" result.
#[derive(Error, Debug)]
pub enum BrowserFallbackError {
    /// Rendering did not finish within the fallback budget.
    #[error("page render timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The render service detected an anti-bot challenge page.
    #[error("page is protected by an anti-bot challenge")]
    Blocked,

    /// The render service crashed or returned a malformed response.
    #[error("render service failed: {0}")]
    Crash(String),
}

/// Non-fatal content-cache failure.
///
/// The pipeline absorbs these: a cache miss or error only costs
/// redundant work, never correctness.
#[derive(Error, Debug)]
#[error("cache operation failed: {0}")]
pub struct CacheError(pub String);

/// Terminal error for a summarization request.
#[derive(Error, Debug)]
pub enum SummarizeError {
    /// The URL was rejected before any network activity.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The browser fallback was required and failed.
    #[error(transparent)]
    BrowserFallback(#[from] BrowserFallbackError),

    /// Content remained below the usable threshold even after the
    /// browser fallback rendered the page.
    #[error("content insufficient for summarization (score {score})")]
    InsufficientContent { score: u8 },

    /// The external summarization service failed.
    #[error("summarization service failed: {0}")]
    Summarizer(String),
}

/// Result type alias for pipeline operations.
pub type Result<T, E = SummarizeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Timeout { seconds: 10 };
        assert!(err.to_string().contains("10"));

        let err = FetchError::HttpStatus { status: 403 };
        assert!(err.to_string().contains("403"));

        let err = FetchError::UnsupportedContentType { content_type: "application/pdf".to_string() };
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn test_browser_fallback_error_display() {
        let err = BrowserFallbackError::Timeout { seconds: 90 };
        assert!(err.to_string().contains("90"));

        assert!(BrowserFallbackError::Blocked.to_string().contains("anti-bot"));
    }

    #[test]
    fn test_summarize_error_from_fallback() {
        let err: SummarizeError = BrowserFallbackError::Blocked.into();
        assert!(matches!(err, SummarizeError::BrowserFallback(_)));
    }

    #[test]
    fn test_insufficient_content_reports_score() {
        let err = SummarizeError::InsufficientContent { score: 12 };
        assert!(err.to_string().contains("12"));
    }
}
