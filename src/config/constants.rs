//! Configuration constants.
//!
//! This module defines the timeouts, size limits, provider defaults and key names
//! used throughout the application.

// Network operation timeouts
/// Total budget for fetching the target page (all redirect hops included).
/// Kept short: the page is supporting evidence, the verdict comes from the provider.
pub const FETCH_TIMEOUT_SECS: u64 = 10;
/// Per-provider budget for one LLM call. LLM inference is much slower than a page fetch.
pub const PROVIDER_TIMEOUT_SECS: u64 = 60;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for page fetches.
///
/// Phishing kits frequently cloak their content from obvious bots, so the fetcher
/// presents itself as a desktop Chrome browser.
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum response body size in bytes (2MB).
/// Bodies larger than this are truncated, not rejected.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum number of HTML characters embedded in a prompt.
pub const MAX_PROMPT_HTML_CHARS: usize = 15_000;

/// Upper bound on JSON object candidates tried when parsing model output.
pub const MAX_JSON_CANDIDATES: usize = 64;

/// Maximum length of an upstream error body quoted in an error message.
pub const MAX_ERROR_BODY_CHARS: usize = 300;

// Redirect handling
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

// URL validation
/// Maximum accepted URL length (matches common browser and server limits).
pub const MAX_URL_LENGTH: usize = 2048;

// Providers
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_CHATGPT_MODEL: &str = "gpt-4o-mini";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const CHATGPT_BASE_URL: &str = "https://api.openai.com/v1";
/// Sampling temperatures. Low, so repeated checks of one URL agree.
pub const GEMINI_TEMPERATURE: f32 = 0.1;
pub const CHATGPT_TEMPERATURE: f32 = 0.1;
/// Maximum provider response body size in bytes (1MB). Larger answers are cut
/// and then fail to decode as an envelope.
pub const MAX_PROVIDER_RESPONSE_SIZE: usize = 1024 * 1024;

// Secrets
/// Default location of the `KEY=VALUE` credentials file.
pub const DEFAULT_KEYS_FILE: &str = "keys.txt";
pub const GEMINI_KEY_NAME: &str = "GEMINI_API";
pub const CHATGPT_KEY_NAME: &str = "CHATGPT_API";

// HTTP front door
pub const DEFAULT_SERVER_PORT: u16 = 5000;
