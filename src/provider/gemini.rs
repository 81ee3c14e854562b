//! Google Gemini `generateContent` client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GEMINI_TEMPERATURE;
use crate::error_handling::{truncate_for_message, ProviderError};
use crate::models::Provider;
use crate::prompt::Prompt;

use super::{endpoint, post_json, require_key, ProviderClient};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Client for the Gemini REST API.
pub struct GeminiClient {
    http: Arc<reqwest::Client>,
    url: String,
}

impl GeminiClient {
    pub fn new(http: Arc<reqwest::Client>, base_url: &str, model: &str) -> Self {
        Self {
            http,
            url: endpoint(base_url, &format!("models/{model}:generateContent")),
        }
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn send(
        &self,
        prompt: &Prompt,
        api_key: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        require_key(Provider::Gemini, api_key)?;

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &prompt.system,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt.user }],
            }],
            generation_config: GenerationConfig {
                temperature: GEMINI_TEMPERATURE,
                response_mime_type: "application/json",
            },
        };

        let request = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", api_key);
        let raw = post_json(request, &body, timeout).await?;
        extract_text(&raw)
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(raw: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(raw).map_err(|e| {
        ProviderError::MalformedUpstreamResponse(format!("Undecodable Gemini response: {e}"))
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({r})"))
            .unwrap_or_else(|| format!("no text in response: {}", truncate_for_message(raw, 120)));
        return Err(ProviderError::MalformedUpstreamResponse(reason));
    }
    Ok(text)
}
