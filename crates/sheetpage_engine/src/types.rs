//! Shared types for the sheet-to-site pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Transport failure classes. The `message` on [`FetchError`] carries the
/// detail; the kind is what callers branch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid URL"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timed out"),
            FailureKind::HttpStatus(code) => write!(f, "HTTP status {code}"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => match actual {
                Some(actual) => write!(f, "payload of {actual} bytes exceeds limit of {max_bytes}"),
                None => write!(f, "payload exceeds limit of {max_bytes} bytes"),
            },
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type:?}")
            }
        }
    }
}

/// A failed sheet fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

/// Transport settings for the sheet fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Hard cap on the payload. Published sheets are small; anything huge
    /// means a misconfigured URL.
    pub max_bytes: u64,
    /// Lowercased media types the fetcher accepts, compared without
    /// parameters. An empty list accepts anything.
    pub allowed_content_types: Vec<String>,
    /// Append a `t=<millis>` query parameter so intermediary caches miss
    /// and edits show up in the next build.
    pub cache_bust: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 4 * 1024 * 1024,
            allowed_content_types: vec![
                "text/csv".to_string(),
                "text/plain".to_string(),
                "application/csv".to_string(),
                "application/vnd.ms-excel".to_string(),
                "application/json".to_string(),
                "text/javascript".to_string(),
                "application/javascript".to_string(),
                "text/tab-separated-values".to_string(),
            ],
            cache_bust: false,
        }
    }
}

/// Bytes and transport metadata from a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// URL as configured, before cache busting.
    pub original_url: String,
    /// URL the payload actually came from, after redirects.
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// What rendering one location produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Rendered(RenderedPage),
    /// The sheet has no row for this slug. The document is a visible
    /// not-found page; reaching here is not a pipeline error.
    NotFound { slug: String, html: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub html: String,
}

/// A single location rendered and persisted, with where it landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltLocation {
    pub outcome: PageOutcome,
    pub path: PathBuf,
}

/// One page written during a site build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPage {
    pub slug: String,
    pub filename: String,
    pub title: String,
    pub bytes: u64,
}

/// Everything a site build wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: Vec<BuiltPage>,
    pub assets: Vec<String>,
    pub output_dir: PathBuf,
    pub built_utc: String,
}

/// Sheet statistics gathered without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReport {
    pub source_url: String,
    pub data_rows: usize,
    pub columns: usize,
    pub products: Vec<ProductStat>,
}

/// Per-product row and section counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStat {
    pub slug: String,
    pub rows: usize,
    pub benefits: usize,
    pub steps: usize,
    pub for_whom: usize,
    pub not_for: usize,
    pub faq: usize,
}
