//! Sheet download over HTTP with size, type and redirect guards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use page_logging::{page_debug, page_info};

use crate::types::{FailureKind, FetchError, FetchMetadata, FetchOutput, FetchSettings};

/// Transport seam. Production uses [`SheetFetcher`]; tests substitute
/// canned payloads.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// reqwest-backed fetcher for published sheet endpoints.
#[derive(Debug, Clone)]
pub struct SheetFetcher {
    settings: FetchSettings,
}

impl SheetFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn request_url(&self, url: &str) -> Result<reqwest::Url, FetchError> {
        let mut parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if self.settings.cache_bust {
            let stamp = chrono::Utc::now().timestamp_millis().to_string();
            parsed.query_pairs_mut().append_pair("t", &stamp);
        }
        Ok(parsed)
    }

    fn build_client(&self, redirects: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = redirects.fetch_add(1, Ordering::SeqCst) + 1;
            if count > limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn content_type_allowed(&self, content_type: &str) -> bool {
        if self.settings.allowed_content_types.is_empty() {
            return true;
        }
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        self.settings.allowed_content_types.iter().any(|allowed| media_type == *allowed)
    }
}

fn classify(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    }
}

#[async_trait]
impl Fetcher for SheetFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let request_url = self.request_url(url)?;
        let redirects = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirects.clone())?;

        page_debug!("GET {request_url}");
        let response = client
            .get(request_url)
            .send()
            .await
            .map_err(|err| FetchError::new(classify(&err), err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{url} answered {status}"),
            ));
        }

        if let Some(length) = response.content_length() {
            if length > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(length),
                    },
                    format!("{url} announces {length} bytes"),
                ));
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(served) = &content_type {
            if !self.content_type_allowed(served) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType { content_type: served.clone() },
                    format!("{url} served {served:?}"),
                ));
            }
        }

        let final_url = response.url().to_string();
        let mut bytes: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| FetchError::new(classify(&err), err.to_string()))?;
            if bytes.len() as u64 + chunk.len() as u64 > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge { max_bytes: self.settings.max_bytes, actual: None },
                    format!("{url} exceeded the size limit mid-stream"),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: redirects.load(Ordering::SeqCst),
            content_type,
            byte_len: bytes.len() as u64,
        };
        page_info!(
            "fetched {} bytes from {} ({} redirects)",
            metadata.byte_len,
            metadata.final_url,
            metadata.redirect_count
        );
        Ok(FetchOutput { bytes, metadata })
    }
}
