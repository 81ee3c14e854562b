//! Analysis orchestration.
//!
//! One request runs Fetch -> Prompt -> Dispatch -> Collect. The page is fetched
//! once, a single prompt is built, and every requested provider is called on
//! its own task under its own timeout. Failures stay in the slot of the
//! provider that produced them, so one slow or broken backend never costs the
//! other its verdict.

mod state;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::config::Config;
use crate::error_handling::{AnalysisError, InitializationError, ProviderError};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::initialization::{init_fetch_client, init_provider_client};
use crate::models::{AnalysisRequest, AnalysisResult, ErrorInfo, Mode, Provider, ProviderVerdict};
use crate::parse::parse_response;
use crate::prompt::{Prompt, PromptBuilder};
use crate::provider::{ProviderClient, ProviderClients};
use crate::secrets::Secrets;

pub use state::AnalysisState;

/// Runs analyses. Cheap to share: everything inside is read-only after construction.
pub struct Orchestrator {
    fetcher: Arc<dyn PageFetcher>,
    clients: ProviderClients,
    secrets: Arc<Secrets>,
    provider_timeout: Duration,
    prompt_builder: PromptBuilder,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        clients: ProviderClients,
        secrets: Arc<Secrets>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            clients,
            secrets,
            provider_timeout,
            prompt_builder: PromptBuilder::default(),
        }
    }

    /// Builds the HTTP-backed fetcher and provider clients described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn from_config(config: &Config, secrets: Arc<Secrets>) -> Result<Self, InitializationError> {
        let fetcher = HttpFetcher::new(init_fetch_client(config)?, config.fetch_timeout());
        let clients = ProviderClients::from_config(config, init_provider_client()?);
        Ok(Self::new(
            Arc::new(fetcher),
            clients,
            secrets,
            config.provider_timeout(),
        ))
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    /// Validates the input and runs a full analysis.
    ///
    /// # Errors
    ///
    /// * `AnalysisError::Validation` if the URL is unusable
    /// * `AnalysisError::Configuration` if none of the providers selected by
    ///   `mode` has an API key
    pub async fn analyze(
        &self,
        target_url: &str,
        mode: Mode,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request = AnalysisRequest::new(target_url, mode)?;
        self.check_configured(mode)?;
        Ok(self.run(request).await)
    }

    fn check_configured(&self, mode: Mode) -> Result<(), AnalysisError> {
        if mode.providers().iter().any(|p| self.secrets.has_key(*p)) {
            return Ok(());
        }
        let names: Vec<&str> = mode.providers().iter().map(|p| p.display_name()).collect();
        Err(AnalysisError::Configuration(format!(
            "No API key configured for {}",
            names.join(" or ")
        )))
    }

    /// Runs an already validated request. Always reaches `Done`.
    pub async fn run(&self, request: AnalysisRequest) -> AnalysisResult {
        let url = request.target_url().to_string();

        log_state(&url, AnalysisState::Fetching);
        let fetched = self.fetcher.fetch(&url).await;

        log_state(&url, AnalysisState::Prompting);
        let prompt = match fetched {
            Ok(page) => {
                if page.final_url != url {
                    debug!("{url} resolved to {}", page.final_url);
                }
                if page.truncated {
                    debug!("Page body for {url} was truncated");
                }
                self.prompt_builder.build(&url, &page.html)
            }
            Err(e) => {
                warn!("Failed to fetch {url}: {e}. Continuing without page source");
                self.prompt_builder.build_without_source(&url, &e)
            }
        };
        let prompt = Arc::new(prompt);

        log_state(&url, AnalysisState::Dispatching);
        let providers = request.mode().providers();
        let handles: Vec<_> = providers
            .iter()
            .map(|&provider| {
                tokio::spawn(call_provider(
                    provider,
                    self.clients.get(provider),
                    self.secrets.get_key(provider).map(str::to_string),
                    Arc::clone(&prompt),
                    self.provider_timeout,
                ))
            })
            .collect();

        log_state(&url, AnalysisState::Collecting);
        let verdicts = join_all(handles)
            .await
            .into_iter()
            .zip(providers)
            .map(|(joined, &provider)| {
                joined.unwrap_or_else(|e| {
                    warn!("{provider} task for {url} did not complete: {e}");
                    ProviderVerdict::failure(
                        provider,
                        ErrorInfo::from(&ProviderError::Unavailable(format!(
                            "Provider task failed: {e}"
                        ))),
                    )
                })
            })
            .collect();

        log_state(&url, AnalysisState::Done);
        let result = AnalysisResult::new(request, verdicts);
        for v in result.verdicts() {
            info!("{} verdict for {}: {}", v.provider, url, v.verdict);
        }
        result
    }
}

fn log_state(url: &str, state: AnalysisState) {
    debug!("[{url}] -> {state}");
}

/// One provider's slot, from key lookup to parsed verdict.
async fn call_provider(
    provider: Provider,
    client: Option<Arc<dyn ProviderClient>>,
    api_key: Option<String>,
    prompt: Arc<Prompt>,
    timeout: Duration,
) -> ProviderVerdict {
    let fail = |error: ProviderError| {
        warn!("{provider} failed: {error}");
        ProviderVerdict::failure(provider, ErrorInfo::from(&error))
    };

    let Some(api_key) = api_key else {
        return fail(ProviderError::Configuration(format!(
            "No API key configured for {provider}"
        )));
    };
    let Some(client) = client else {
        return fail(ProviderError::Configuration(format!(
            "No client registered for {provider}"
        )));
    };

    let raw = match tokio::time::timeout(timeout, client.send(&prompt, &api_key, timeout)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => return fail(e),
        Err(_) => return fail(ProviderError::Timeout(timeout)),
    };

    match parse_response(&raw) {
        Ok(parsed) => ProviderVerdict::success(provider, parsed.verdict, parsed.reasoning),
        Err(e) => {
            warn!("{provider} returned an unusable answer: {e}");
            ProviderVerdict::failure(provider, ErrorInfo::from(&e))
        }
    }
}
