//! HTTP client initialization.
//!
//! Two clients are built at startup and shared by `Arc`: one for fetching the
//! page under analysis and one for calling the LLM APIs.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};

/// Initializes the page fetch client.
///
/// Redirects are disabled so the fetcher can walk and bound the chain itself.
/// The overall timeout matches the fetch budget and the user agent mimics a
/// desktop browser.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_fetch_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.fetch_timeout())
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the client used for provider API calls.
///
/// No client-wide timeout is set: each call carries the provider budget.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_provider_client() -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(Arc::new(client))
}
