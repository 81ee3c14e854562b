//! URL validation and normalization utilities.

use log::warn;
use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::ValidationError;

/// Validates and normalizes a URL.
///
/// Trims whitespace, adds an `https://` prefix if no scheme is present, then checks
/// that the URL is syntactically valid, uses the http/https scheme and names a host.
/// Rejects URLs longer than `MAX_URL_LENGTH`.
///
/// # Errors
///
/// Returns the `ValidationError` describing why the input cannot be analyzed.
pub fn validate_and_normalize_url(url: &str) -> Result<Url, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::Empty);
    }

    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            url.chars().take(50).collect::<String>()
        );
        return Err(ValidationError::TooLong {
            len: url.len(),
            max: MAX_URL_LENGTH,
        });
    }

    // Normalize: add https:// prefix if no scheme was given
    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    let parsed = Url::parse(&normalized).map_err(|e| {
        warn!("Rejecting invalid URL {url}: {e}");
        ValidationError::Malformed(url.to_string())
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            warn!("Rejecting unsupported scheme for URL: {url}");
            return Err(ValidationError::UnsupportedScheme(other.to_string()));
        }
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(ValidationError::Malformed(url.to_string())),
    }
}
