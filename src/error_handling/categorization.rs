//! Error categorization.
//!
//! Maps `reqwest` failures and upstream HTTP statuses onto the fetch and provider
//! error taxonomies so raw transport errors never reach callers.

use std::time::Duration;

use crate::config::MAX_ERROR_BODY_CHARS;

use super::types::{FetchError, ProviderError};

const DNS_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host",
    "no record found",
];

const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// Renders an error and all of its sources as one `a: b: c` line.
fn error_chain_text(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

/// Categorizes a `reqwest::Error` raised while fetching the target page.
///
/// HTTP status errors are checked first, then the transport failure is
/// classified from the error chain.
pub fn categorize_fetch_error(error: &reqwest::Error, timeout: Duration) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::HttpStatus(status.as_u16());
    }
    if error.is_redirect() {
        return FetchError::TooManyRedirects(crate::config::MAX_REDIRECT_HOPS);
    }
    classify_transport_failure(
        &error_chain_text(error),
        error.is_timeout(),
        error.is_connect(),
        timeout,
    )
}

/// Classifies a transport failure from its rendered error chain.
fn classify_transport_failure(
    chain: &str,
    is_timeout: bool,
    is_connect: bool,
    timeout: Duration,
) -> FetchError {
    let lower = chain.to_lowercase();
    if is_timeout || lower.contains("timed out") {
        FetchError::Timeout(timeout)
    } else if DNS_MARKERS.iter().any(|m| lower.contains(m)) {
        FetchError::Dns(chain.to_string())
    } else if TLS_MARKERS.iter().any(|m| lower.contains(m)) {
        FetchError::Tls(chain.to_string())
    } else if is_connect {
        FetchError::Connect(chain.to_string())
    } else {
        FetchError::Other(chain.to_string())
    }
}

/// Categorizes a non-2xx answer from an LLM API.
pub fn categorize_provider_status(status: u16, body: &str) -> ProviderError {
    let detail = format!(
        "HTTP {}: {}",
        status,
        truncate_for_message(body.trim(), MAX_ERROR_BODY_CHARS)
    );
    match status {
        401 | 403 => ProviderError::Unauthorized(detail),
        429 => ProviderError::RateLimited(detail),
        _ => ProviderError::Unavailable(detail),
    }
}

/// Categorizes a `reqwest::Error` raised while calling an LLM API.
pub fn categorize_provider_transport(error: &reqwest::Error, timeout: Duration) -> ProviderError {
    if let Some(status) = error.status() {
        return categorize_provider_status(status.as_u16(), "");
    }
    if error.is_timeout() {
        ProviderError::Timeout(timeout)
    } else if error.is_decode() || error.is_body() {
        ProviderError::MalformedUpstreamResponse(error_chain_text(error))
    } else {
        ProviderError::Unavailable(error_chain_text(error))
    }
}

/// Cuts `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_for_message(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}... (truncated)", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[derive(Debug)]
    struct Layer {
        msg: &'static str,
        source: Option<Box<Layer>>,
    }

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source
                .as_deref()
                .map(|s| s as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn test_error_chain_text_joins_sources() {
        let err = Layer {
            msg: "error sending request",
            source: Some(Box::new(Layer {
                msg: "dns error",
                source: Some(Box::new(Layer {
                    msg: "failed to lookup address information",
                    source: None,
                })),
            })),
        };
        assert_eq!(
            error_chain_text(&err),
            "error sending request: dns error: failed to lookup address information"
        );
    }

    #[test]
    fn test_error_chain_text_skips_repeated_messages() {
        let err = Layer {
            msg: "connection refused",
            source: Some(Box::new(Layer {
                msg: "connection refused",
                source: None,
            })),
        };
        assert_eq!(error_chain_text(&err), "connection refused");
    }

    #[test]
    fn test_classify_timeout() {
        assert_eq!(
            classify_transport_failure("operation timed out", false, true, secs(10)),
            FetchError::Timeout(secs(10))
        );
        assert_eq!(
            classify_transport_failure("error sending request", true, false, secs(7)),
            FetchError::Timeout(secs(7))
        );
    }

    #[test]
    fn test_classify_dns() {
        let chain = "error sending request: client error (Connect): dns error: failed to lookup address information: Name or service not known";
        assert!(matches!(
            classify_transport_failure(chain, false, true, secs(10)),
            FetchError::Dns(_)
        ));
    }

    #[test]
    fn test_classify_tls() {
        let chain = "error sending request: client error (Connect): invalid peer certificate: Expired";
        assert!(matches!(
            classify_transport_failure(chain, false, true, secs(10)),
            FetchError::Tls(_)
        ));
    }

    #[test]
    fn test_classify_connect_and_other() {
        assert!(matches!(
            classify_transport_failure("tcp connect error: Connection refused", false, true, secs(10)),
            FetchError::Connect(_)
        ));
        assert!(matches!(
            classify_transport_failure("connection closed before message completed", false, false, secs(10)),
            FetchError::Other(_)
        ));
    }

    #[test]
    fn test_categorize_provider_status() {
        assert!(matches!(
            categorize_provider_status(401, "bad key"),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            categorize_provider_status(403, ""),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            categorize_provider_status(429, "slow down"),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            categorize_provider_status(503, "overloaded"),
            ProviderError::Unavailable(_)
        ));
        match categorize_provider_status(400, "  model not found \n") {
            ProviderError::Unavailable(detail) => {
                assert_eq!(detail, "HTTP 400: model not found")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_for_message() {
        assert_eq!(truncate_for_message("short", 10), "short");
        assert_eq!(truncate_for_message("abcdef", 3), "abc... (truncated)");
        // Multi-byte characters are cut on a boundary
        assert_eq!(truncate_for_message("ééé", 2), "éé... (truncated)");
    }
}
