//! Layer 4: the extraction decision router.
//!
//! A pure lookup table over (sufficiency band, domain reliability).
//! Keeping it as one exhaustive `match` rather than scattered
//! conditionals preserves the guarantee that escalation involves no
//! hidden judgment: every input pair maps to exactly one action, and
//! the table is testable in isolation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use url::Url;

use crate::quality::Band;

/// The routed action for one scored extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the content to the summarizer as-is.
    DirectSummarize,
    /// Hand the content over, flagging lower confidence.
    CautiousSummarize,
    /// Escalate to the headless-browser renderer.
    BrowserFallback,
    /// Give up with a user-visible failure.
    FailExplicit,
}

/// Routes a first-pass extraction.
///
/// Reliability feeds exactly one cell: thin-but-real content from a
/// trusted domain is summarized cautiously instead of rendered. An
/// unprocessable result escalates regardless of reliability, since
/// trust in a domain says nothing about a fetch that failed outright.
pub fn decide(band: Band, reliable_domain: bool) -> Decision {
    match (band, reliable_domain) {
        (Band::Sufficient, _) => Decision::DirectSummarize,
        (Band::Insufficient, true) => Decision::CautiousSummarize,
        (Band::Insufficient, false) => Decision::BrowserFallback,
        (Band::Unprocessable, _) => Decision::BrowserFallback,
    }
}

/// Routes the re-scored output of the browser fallback.
///
/// The fallback is never escalated a second time: any cell that would
/// ask for it again becomes an explicit failure.
pub fn decide_post_fallback(band: Band, reliable_domain: bool) -> Decision {
    match decide(band, reliable_domain) {
        Decision::BrowserFallback => Decision::FailExplicit,
        action => action,
    }
}

/// Domains known to serve usable static HTML or structured data.
///
/// A static allow-list maintained as configuration, never inferred.
/// Matching is by host suffix, so `www.bbc.com` matches `bbc.com`.
#[derive(Debug, Clone)]
pub struct ReliableDomains {
    domains: Vec<String>,
}

/// Sources that reliably ship article text without rendering.
const DEFAULT_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "bbc.com",
    "reuters.com",
    "apnews.com",
    "theguardian.com",
    "nytimes.com",
    "cna.com.tw",
    "udn.com",
    "ltn.com.tw",
    "technews.tw",
    "ithome.com.tw",
    "github.com",
    "docs.rs",
    "developer.mozilla.org",
    "stackoverflow.com",
];

impl Default for ReliableDomains {
    fn default() -> Self {
        Self { domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect() }
    }
}

impl ReliableDomains {
    /// Builds a list from explicit domains.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { domains: domains.into_iter().map(|d| d.into().to_lowercase()).collect() }
    }

    /// Loads a list from a file: one domain per line, `#` comments and
    /// blank lines ignored.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let domains = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_lowercase())
            .collect();
        Ok(Self { domains })
    }

    /// Standard location for the override file.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("brevia").join("reliable-domains.txt"))
    }

    /// Loads the override file when present, otherwise the built-in list.
    pub fn load() -> Self {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "failed to read domain list, using defaults");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Whether the URL's host is on the allow-list.
    pub fn is_reliable(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else { return false };
        let host = host.to_lowercase();
        self.domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }
}
