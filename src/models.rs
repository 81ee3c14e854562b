//! Request, page, verdict and result types shared by the analysis pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use strum_macros::{EnumIter, IntoStaticStr};

use crate::app::validate_and_normalize_url;
use crate::error_handling::{ParseError, ProviderError, ValidationError};

/// One external LLM backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Gemini,
    ChatGpt,
}

impl Provider {
    /// Key used for this provider in request/response bodies (`gemini`, `chatgpt`).
    pub fn as_key(&self) -> &'static str {
        self.into()
    }

    /// Human-facing name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::ChatGpt => "ChatGPT",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which provider(s) to consult for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Gemini,
    ChatGpt,
    Both,
}

impl Mode {
    /// Providers dispatched for this mode, in a stable order.
    pub fn providers(&self) -> &'static [Provider] {
        match self {
            Mode::Gemini => &[Provider::Gemini],
            Mode::ChatGpt => &[Provider::ChatGpt],
            Mode::Both => &[Provider::Gemini, Provider::ChatGpt],
        }
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Mode::Gemini),
            "chatgpt" => Ok(Mode::ChatGpt),
            "both" => Ok(Mode::Both),
            _ => Err(ValidationError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Gemini => "gemini",
            Mode::ChatGpt => "chatgpt",
            Mode::Both => "both",
        })
    }
}

/// A validated user request. Construct with [`AnalysisRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    target_url: String,
    mode: Mode,
}

impl AnalysisRequest {
    /// Validates and normalizes `target_url`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the URL is empty, too long, malformed or
    /// not http(s).
    pub fn new(target_url: &str, mode: Mode) -> Result<Self, ValidationError> {
        let normalized = validate_and_normalize_url(target_url)?;
        Ok(Self {
            target_url: normalized.to_string(),
            mode,
        })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Content retrieved for one request. Never shared across requests.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: String,
    /// Decoded body, possibly empty
    pub html: String,
    pub fetched_at: DateTime<Utc>,
    /// The body hit the size ceiling and was cut short
    pub truncated: bool,
}

/// Classification of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Safe,
    Phishing,
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Safe => "Safe",
            Verdict::Phishing => "Phishing",
            Verdict::Unknown => "Unknown",
        })
    }
}

/// Why a provider slot has no usable verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Stable machine label, e.g. `timeout` or `invalid_verdict_value`
    pub kind: &'static str,
    /// Human-readable description
    pub message: String,
}

impl From<&ProviderError> for ErrorInfo {
    fn from(error: &ProviderError) -> Self {
        Self {
            kind: error.into(),
            message: error.to_string(),
        }
    }
}

impl From<&ParseError> for ErrorInfo {
    fn from(error: &ParseError) -> Self {
        Self {
            kind: error.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome for one provider.
///
/// Either `verdict` is Safe/Phishing and `error` is `None`, or `verdict` is
/// `Unknown` and `error` explains why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderVerdict {
    pub provider: Provider,
    pub verdict: Verdict,
    pub reasoning: String,
    pub error: Option<ErrorInfo>,
}

impl ProviderVerdict {
    pub fn success(provider: Provider, verdict: Verdict, reasoning: String) -> Self {
        Self {
            provider,
            verdict,
            reasoning,
            error: None,
        }
    }

    pub fn failure(provider: Provider, error: ErrorInfo) -> Self {
        Self {
            provider,
            verdict: Verdict::Unknown,
            reasoning: String::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Wire shape of one provider slot.
#[derive(Debug, Serialize)]
pub struct VerdictBody<'a> {
    pub verdict: Verdict,
    pub reasoning: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl<'a> From<&'a ProviderVerdict> for VerdictBody<'a> {
    fn from(v: &'a ProviderVerdict) -> Self {
        Self {
            verdict: v.verdict,
            reasoning: &v.reasoning,
            error: v.error.as_ref().map(|e| e.message.clone()),
            error_kind: v.error.as_ref().map(|e| e.kind),
        }
    }
}

/// The merged result of one request: exactly one slot per requested provider.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    request: AnalysisRequest,
    per_provider: BTreeMap<Provider, ProviderVerdict>,
}

impl AnalysisResult {
    pub(crate) fn new(request: AnalysisRequest, verdicts: Vec<ProviderVerdict>) -> Self {
        let per_provider = verdicts
            .into_iter()
            .filter(|v| request.mode().providers().contains(&v.provider))
            .map(|v| (v.provider, v))
            .collect();
        Self {
            request,
            per_provider,
        }
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub fn get(&self, provider: Provider) -> Option<&ProviderVerdict> {
        self.per_provider.get(&provider)
    }

    pub fn verdicts(&self) -> impl Iterator<Item = &ProviderVerdict> {
        self.per_provider.values()
    }

    pub fn len(&self) -> usize {
        self.per_provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_provider.is_empty()
    }

    /// `{ "gemini": {...}, "chatgpt": {...} }` keyed by requested provider.
    pub fn response_body(&self) -> BTreeMap<&'static str, VerdictBody<'_>> {
        self.per_provider
            .iter()
            .map(|(provider, verdict)| (provider.as_key(), VerdictBody::from(verdict)))
            .collect()
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.response_body().serialize(serializer)
    }
}
