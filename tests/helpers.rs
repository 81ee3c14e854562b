// Shared test helpers: in-process fakes for the fetcher and provider clients.
//
// Each test file pulls this in with `mod helpers;`, so not every helper is used
// by every file.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use phish_detector::{
    FetchError, FetchedPage, Orchestrator, PageFetcher, Prompt, Provider, ProviderClient,
    ProviderClients, ProviderError, Secrets,
};

/// Fetcher returning a fixed page or error.
pub struct FakeFetcher {
    result: Result<String, FetchError>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn page(html: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(html.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map(|html| FetchedPage {
            final_url: url.to_string(),
            html,
            fetched_at: chrono::Utc::now(),
            truncated: false,
        })
    }
}

/// What a fake provider does when called.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Error(ProviderError),
    /// Never answers; only the orchestrator's timeout ends the call.
    Hang,
    Panic,
}

pub struct FakeProvider {
    provider: Provider,
    reply: Reply,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<Prompt>>,
}

impl FakeProvider {
    pub fn new(provider: Provider, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            provider,
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(provider: Provider, text: &str) -> Arc<Self> {
        Self::new(provider, Reply::Text(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(
        &self,
        prompt: &Prompt,
        _api_key: &str,
        _timeout: Duration,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Error(e) => Err(e.clone()),
            Reply::Hang => std::future::pending().await,
            Reply::Panic => panic!("provider exploded"),
        }
    }
}

pub fn both_keys() -> Secrets {
    Secrets::new(Some("gemini-key".into()), Some("chatgpt-key".into()))
}

pub fn orchestrator(
    fetcher: Arc<FakeFetcher>,
    gemini: Arc<FakeProvider>,
    chatgpt: Arc<FakeProvider>,
    secrets: Secrets,
    provider_timeout: Duration,
) -> Orchestrator {
    Orchestrator::new(
        fetcher,
        ProviderClients::new().with_client(gemini).with_client(chatgpt),
        Arc::new(secrets),
        provider_timeout,
    )
}

pub const SAFE_JSON: &str = r#"{"verdict":"Safe","reasoning":"No suspicious forms"}"#;
pub const PHISHING_JSON: &str = r#"{"verdict":"Phishing","reasoning":"Credential form posts to a foreign domain"}"#;
