//! LLM provider clients.
//!
//! Each backend implements [`ProviderClient`]: it takes a [`Prompt`] and returns
//! the model's raw text. Interpreting that text is the parser's job.

mod chatgpt;
mod gemini;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::config::{Config, MAX_PROVIDER_RESPONSE_SIZE};
use crate::error_handling::{
    categorize_provider_status, categorize_provider_transport, ProviderError,
};
use crate::fetch::body::{collect_limited, decode_body};
use crate::models::Provider;
use crate::prompt::Prompt;

pub use chatgpt::ChatGptClient;
pub use gemini::GeminiClient;

/// One LLM backend.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which provider this client talks to.
    fn provider(&self) -> Provider;

    /// Sends `prompt` and returns the model's raw text answer.
    ///
    /// A blank `api_key` fails with `ProviderError::Configuration` before any
    /// network traffic.
    async fn send(
        &self,
        prompt: &Prompt,
        api_key: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError>;
}

/// The client registered for each provider.
#[derive(Clone, Default)]
pub struct ProviderClients {
    clients: HashMap<Provider, Arc<dyn ProviderClient>>,
}

impl ProviderClients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `client` under its own provider, replacing any previous one.
    pub fn with_client(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.clients.insert(client.provider(), client);
        self
    }

    /// HTTP clients for every provider, configured from `config`.
    pub fn from_config(config: &Config, http: Arc<reqwest::Client>) -> Self {
        Provider::iter().fold(Self::new(), |clients, provider| {
            clients.with_client(create_provider_client(provider, config, Arc::clone(&http)))
        })
    }

    pub fn get(&self, provider: Provider) -> Option<Arc<dyn ProviderClient>> {
        self.clients.get(&provider).cloned()
    }
}

/// Builds the HTTP client for `provider` using the configured model and base URL.
pub fn create_provider_client(
    provider: Provider,
    config: &Config,
    http: Arc<reqwest::Client>,
) -> Arc<dyn ProviderClient> {
    match provider {
        Provider::Gemini => Arc::new(GeminiClient::new(
            http,
            &config.gemini_base_url,
            &config.gemini_model,
        )),
        Provider::ChatGpt => Arc::new(ChatGptClient::new(
            http,
            &config.chatgpt_base_url,
            &config.chatgpt_model,
        )),
    }
}

pub(crate) fn require_key(provider: Provider, api_key: &str) -> Result<(), ProviderError> {
    if api_key.trim().is_empty() {
        return Err(ProviderError::Configuration(format!(
            "No API key configured for {provider}"
        )));
    }
    Ok(())
}

/// Posts `body` as JSON and returns the response text of a 2xx answer.
///
/// The response body is read up to `MAX_PROVIDER_RESPONSE_SIZE` bytes. Non-2xx
/// statuses and transport failures are mapped onto `ProviderError`.
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    request: reqwest::RequestBuilder,
    body: &T,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let response = request
        .json(body)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| categorize_provider_transport(&e, timeout))?;

    let status = response.status();
    let url = response.url().to_string();
    let body = collect_limited(response.bytes_stream(), MAX_PROVIDER_RESPONSE_SIZE, &url)
        .await
        .map_err(|e| categorize_provider_transport(&e, timeout))?;
    if body.truncated {
        warn!("Response from {url} was cut at {MAX_PROVIDER_RESPONSE_SIZE} bytes");
    }
    let text = decode_body(&body.bytes);

    if !status.is_success() {
        debug!("Provider answered {status}: {} bytes", text.len());
        return Err(categorize_provider_status(status.as_u16(), &text));
    }
    Ok(text)
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
