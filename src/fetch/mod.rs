//! Page retrieval.
//!
//! Fetches the live HTML of the URL under analysis. Redirects are followed by
//! hand so the hop limit is enforced here rather than inside `reqwest`, and the
//! whole fetch (all hops plus the body) runs under a single deadline.

pub(crate) mod body;
mod redirects;
pub(crate) mod request;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::config::{MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{categorize_fetch_error, FetchError};
use crate::models::FetchedPage;

use body::{collect_limited, decode_body, is_html_content_type};
use redirects::follow_redirects;

/// Retrieves the page behind a URL.
///
/// Implemented by [`HttpFetcher`] for real traffic; tests substitute their own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, returning its HTML and the URL that finally answered.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// `reqwest`-backed page fetcher.
///
/// The client should be built by
/// [`init_fetch_client`](crate::initialization::init_fetch_client), which
/// disables automatic redirects.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
    timeout: Duration,
    max_redirect_hops: usize,
    max_body_size: usize,
}

impl HttpFetcher {
    /// Creates a fetcher with the default hop and body limits.
    pub fn new(client: Arc<reqwest::Client>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            max_redirect_hops: MAX_REDIRECT_HOPS,
            max_body_size: MAX_RESPONSE_BODY_SIZE,
        }
    }

    /// Overrides the number of redirects followed before giving up.
    pub fn with_max_redirect_hops(mut self, hops: usize) -> Self {
        self.max_redirect_hops = hops;
        self
    }

    /// Overrides the body size ceiling in bytes.
    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    async fn fetch_inner(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let (response, chain) =
            follow_redirects(&self.client, url, self.max_redirect_hops, self.timeout).await?;

        let final_url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            debug!("Fetch of {url} ended at {final_url} with status {status}");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html_content_type(content_type) {
                debug!("Non-HTML content type '{content_type}' for {final_url}, analyzing anyway");
            }
        }

        let timeout = self.timeout;
        let body = collect_limited(response.bytes_stream(), self.max_body_size, &final_url)
            .await
            .map_err(|e| categorize_fetch_error(&e, timeout))?;

        debug!(
            "Fetched {} bytes from {} ({} hop(s){})",
            body.bytes.len(),
            final_url,
            chain.len().saturating_sub(1),
            if body.truncated { ", truncated" } else { "" }
        );

        Ok(FetchedPage {
            final_url,
            html: decode_body(&body.bytes),
            fetched_at: Utc::now(),
            truncated: body.truncated,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match tokio::time::timeout(self.timeout, self.fetch_inner(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}
