//! OpenAI chat completions client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CHATGPT_TEMPERATURE;
use crate::error_handling::ProviderError;
use crate::models::Provider;
use crate::prompt::Prompt;

use super::{endpoint, post_json, require_key, ProviderClient};

#[derive(Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    refusal: Option<String>,
}

/// Client for the OpenAI chat completions API.
pub struct ChatGptClient {
    http: Arc<reqwest::Client>,
    url: String,
    model: String,
}

impl ChatGptClient {
    pub fn new(http: Arc<reqwest::Client>, base_url: &str, model: &str) -> Self {
        Self {
            http,
            url: endpoint(base_url, "chat/completions"),
            model: model.to_string(),
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> ChatCompletionsRequest<'a> {
        ChatCompletionsRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: CHATGPT_TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[async_trait]
impl ProviderClient for ChatGptClient {
    fn provider(&self) -> Provider {
        Provider::ChatGpt
    }

    async fn send(
        &self,
        prompt: &Prompt,
        api_key: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        require_key(Provider::ChatGpt, api_key)?;

        let request = self.http.post(&self.url).bearer_auth(api_key);
        let raw = post_json(request, &self.request_body(prompt), timeout).await?;
        extract_text(&raw)
    }
}

fn extract_text(raw: &str) -> Result<String, ProviderError> {
    let response: ChatCompletionsResponse = serde_json::from_str(raw).map_err(|e| {
        ProviderError::MalformedUpstreamResponse(format!("Undecodable ChatGPT response: {e}"))
    })?;

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| ProviderError::MalformedUpstreamResponse("No choices in response".into()))?;

    match message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::MalformedUpstreamResponse(match message.refusal {
            Some(refusal) => format!("Model refused: {refusal}"),
            None => "Empty message content".to_string(),
        })),
    }
}
