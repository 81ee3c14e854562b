//! Error type definitions.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::IntoStaticStr;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Malformed inbound request. Aborts the whole request.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValidationError {
    #[error("URL is required")]
    Empty,

    #[error("URL is too long ({len} > {max} characters)")]
    TooLong { len: usize, max: usize },

    #[error("Invalid URL '{0}'")]
    Malformed(String),

    #[error("Unsupported URL scheme '{0}' (only http and https are allowed)")]
    UnsupportedScheme(String),

    #[error("Unknown mode '{0}' (expected gemini, chatgpt or both)")]
    InvalidMode(String),
}

/// Page retrieval failure. Never fatal: analysis continues without the page.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FetchError {
    #[error("Timed out fetching page after {0:?}")]
    Timeout(Duration),

    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Site responded with HTTP status {0}")]
    HttpStatus(u16),

    #[error("Too many redirects (more than {0})")]
    TooManyRedirects(usize),

    #[error("Could not connect: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Other(String),
}

/// Failure of one LLM call. Scoped to that provider's slot.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),
}

/// The provider answered, but not with a usable verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ParseError {
    #[error("Response did not contain a JSON object: {0}")]
    NotJson(String),

    #[error("Response JSON is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("Verdict must be 'Safe' or 'Phishing', got {0}")]
    InvalidVerdictValue(String),
}

/// Failures that abort a whole analysis request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// None of the requested providers has an API key.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
