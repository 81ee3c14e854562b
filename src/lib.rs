//! phish_detector library: LLM-backed phishing checks for a single URL
//!
//! Fetches the live HTML behind a URL, asks one or two LLM providers (Gemini,
//! ChatGPT) for a `Safe`/`Phishing` verdict, and merges their answers into one
//! result with a slot per provider. A failing provider only affects its own slot.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use phish_detector::{Config, Mode, Orchestrator, Secrets};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let secrets = Arc::new(Secrets::load(&config.keys_file));
//! let orchestrator = Orchestrator::from_config(&config, secrets)?;
//!
//! let result = orchestrator.analyze("example.com", Mode::Both).await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
mod models;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod provider;
mod secrets;
pub mod server;

// Re-export public API
pub use app::validate_and_normalize_url;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    AnalysisError, FetchError, InitializationError, ParseError, ProviderError, ValidationError,
};
pub use fetch::{HttpFetcher, PageFetcher};
pub use models::{
    AnalysisRequest, AnalysisResult, ErrorInfo, FetchedPage, Mode, Provider, ProviderVerdict,
    Verdict, VerdictBody,
};
pub use orchestrator::Orchestrator;
pub use prompt::{Prompt, PromptBuilder};
pub use provider::{ProviderClient, ProviderClients};
pub use secrets::Secrets;
