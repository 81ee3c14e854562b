//! Redirect chain resolution.

use std::time::Duration;

use log::{debug, warn};
use url::Url;

use crate::error_handling::{categorize_fetch_error, FetchError};
use crate::fetch::request::RequestHeaders;

/// Returns true for the statuses that carry a `Location` worth following.
pub(crate) fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolves a `Location` header value against the URL that produced it.
///
/// Absolute locations replace the current URL; relative ones are joined to it.
pub(crate) fn resolve_location(current: &str, location: &str) -> Result<Url, FetchError> {
    let next = Url::parse(location)
        .or_else(|_| Url::parse(current).and_then(|base| base.join(location)))
        .map_err(|e| FetchError::Other(format!("Invalid redirect location '{location}': {e}")))?;

    match next.scheme() {
        "http" | "https" => Ok(next),
        other => Err(FetchError::Other(format!(
            "Redirect to unsupported scheme '{other}'"
        ))),
    }
}

/// Follows redirects by hand, returning the final response and the visited chain.
///
/// The client must have automatic redirects disabled. At most `max_hops` redirects
/// are followed; a chain still redirecting after that fails with
/// `FetchError::TooManyRedirects`. A redirect status without a `Location` header is
/// returned as the final response.
pub(crate) async fn follow_redirects(
    client: &reqwest::Client,
    start_url: &str,
    max_hops: usize,
    timeout: Duration,
) -> Result<(reqwest::Response, Vec<String>), FetchError> {
    let mut chain: Vec<String> = Vec::new();
    let mut current = start_url.to_string();

    loop {
        chain.push(current.clone());
        let resp = RequestHeaders::apply_to_request_builder(client.get(&current))
            .send()
            .await
            .map_err(|e| categorize_fetch_error(&e, timeout))?;

        let status_code = resp.status().as_u16();
        if !is_redirect_status(status_code) {
            return Ok((resp, chain));
        }

        let Some(location) = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
        else {
            warn!("Redirect status {status_code} for {current} but no Location header");
            return Ok((resp, chain));
        };

        // chain.len() - 1 redirects have been followed so far
        if chain.len() > max_hops {
            warn!(
                "Giving up on {start_url} after {max_hops} redirects (last: {current})"
            );
            return Err(FetchError::TooManyRedirects(max_hops));
        }

        let next = resolve_location(&current, &location)?;
        debug!("Redirect {status_code}: {current} -> {next}");
        current = next.to_string();
    }
}
