//! Bounded-time document retrieval.
//!
//! A single-attempt HTTP GET with a hard deadline, a redirect-hop
//! limit, a response-size cap, and a content-type allow-list. There is
//! no retry logic anywhere in this module: the enclosing execution
//! environment is itself time-boxed, so a failed fetch is a definitive
//! answer the decision router acts on, not something to wait out.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, redirect};
use time::OffsetDateTime;
use url::Url;

use crate::error::FetchError;

/// HTTP client settings for the primary fetch path.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Hard deadline for the whole request, in seconds.
    pub timeout_secs: u64,
    /// Browser-like identity; trivially bot-blocked UAs defeat the
    /// cheap path and force needless fallback renders.
    pub user_agent: String,
    /// Accept-Language header value.
    pub accept_language: String,
    /// Response bodies above this size are rejected.
    pub max_body_bytes: usize,
    /// Redirect hops allowed before the chain is declared a loop.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
            max_redirects: 5,
        }
    }
}

/// The raw result of one fetch, handed to the extraction layers and
/// discarded at request end.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: Url,
    pub http_status: u16,
    pub content_type: String,
    pub body: String,
    pub fetched_at: OffsetDateTime,
}

/// Document types the extraction layers can work with.
const SUPPORTED_CONTENT_TYPES: &[&str] =
    &["text/html", "application/xhtml+xml", "text/plain", "application/xml", "text/xml"];

/// Whether a Content-Type header value names an extractable document.
pub fn is_supported_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or("").trim().to_lowercase();
    // Missing header: assume HTML rather than refuse the page.
    essence.is_empty() || SUPPORTED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Parses and validates a URL for fetching.
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }
}

/// Fetches a document with the configured bounds. One attempt, no
/// retries; every failure mode maps to a typed [`FetchError`].
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<RawDocument, FetchError> {
    let parsed_url = parse_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(redirect::Policy::limited(config.max_redirects))
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    tracing::debug!(%parsed_url, timeout_secs = config.timeout_secs, "fetching document");

    let mut response = client
        .get(parsed_url.clone())
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", &config.accept_language)
        .send()
        .await
        .map_err(|e| classify_send_error(&e, config))?;

    let http_status = response.status().as_u16();
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus { status: http_status });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !is_supported_content_type(&content_type) {
        return Err(FetchError::UnsupportedContentType { content_type });
    }

    if let Some(length) = response.content_length()
        && length as usize > config.max_body_bytes
    {
        return Err(FetchError::TooLarge { limit: config.max_body_bytes });
    }

    let mut body_bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_send_error(&e, config))?
    {
        if body_bytes.len() + chunk.len() > config.max_body_bytes {
            return Err(FetchError::TooLarge { limit: config.max_body_bytes });
        }
        body_bytes.extend_from_slice(&chunk);
    }
    let body = String::from_utf8_lossy(&body_bytes).into_owned();

    tracing::info!(%parsed_url, http_status, bytes = body.len(), "fetched document");

    Ok(RawDocument { url: parsed_url, http_status, content_type, body, fetched_at: OffsetDateTime::now_utc() })
}

/// Maps a reqwest transport error onto the fetch taxonomy.
fn classify_send_error(err: &reqwest::Error, config: &FetchConfig) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout { seconds: config.timeout_secs };
    }
    if err.is_redirect() {
        return FetchError::RedirectLoop { limit: config.max_redirects };
    }
    if err.is_connect() {
        let chain = error_chain(err);
        if chain.contains("dns") || chain.contains("resolve") || chain.contains("lookup") {
            return FetchError::Dns(err.to_string());
        }
        if chain.contains("tls") || chain.contains("ssl") || chain.contains("certificate") || chain.contains("handshake")
        {
            return FetchError::Tls(err.to_string());
        }
        return FetchError::Connect(err.to_string());
    }
    FetchError::Transport(err.to_string())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ").to_lowercase()
}
