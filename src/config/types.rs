//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    CHATGPT_BASE_URL, DEFAULT_CHATGPT_MODEL, DEFAULT_GEMINI_MODEL, DEFAULT_KEYS_FILE,
    DEFAULT_SERVER_PORT, DEFAULT_USER_AGENT, FETCH_TIMEOUT_SECS, GEMINI_BASE_URL,
    PROVIDER_TIMEOUT_SECS,
};
use crate::models::Mode;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is accepted
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use phish_detector::Config;
///
/// let config = Config {
///     provider_timeout_seconds: 30,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Path of the `KEY=VALUE` credentials file
    pub keys_file: PathBuf,

    /// Total page fetch timeout in seconds
    pub fetch_timeout_seconds: u64,

    /// Per-provider LLM call timeout in seconds
    pub provider_timeout_seconds: u64,

    /// HTTP User-Agent header value for page fetches
    pub user_agent: String,

    /// Gemini model name
    pub gemini_model: String,

    /// ChatGPT model name
    pub chatgpt_model: String,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// OpenAI API base URL
    pub chatgpt_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            keys_file: PathBuf::from(DEFAULT_KEYS_FILE),
            fetch_timeout_seconds: FETCH_TIMEOUT_SECS,
            provider_timeout_seconds: PROVIDER_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            chatgpt_model: DEFAULT_CHATGPT_MODEL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            chatgpt_base_url: CHATGPT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Checks that every value is usable before any client is built.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.fetch_timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "fetch_timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.provider_timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "provider_timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError::new("user_agent", "must not be empty"));
        }
        for (field, value) in [
            ("gemini_model", &self.gemini_model),
            ("chatgpt_model", &self.chatgpt_model),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::new(field, "must not be empty"));
            }
        }
        for (field, value) in [
            ("gemini_base_url", &self.gemini_base_url),
            ("chatgpt_base_url", &self.chatgpt_base_url),
        ] {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigValidationError::new(
                        field,
                        format!("'{value}' is not an http(s) URL"),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Page fetch budget.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Per-provider call budget.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # One-shot check with both providers
/// phish_detector analyze https://example.com
///
/// # Gemini only, verbose
/// phish_detector --log-level debug analyze example.com --mode gemini
///
/// # HTTP front door
/// phish_detector serve --port 5000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "phish_detector",
    about = "Asks Gemini and/or ChatGPT whether a URL is a phishing site."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Credentials file with GEMINI_API=... and/or CHATGPT_API=... lines
    #[arg(long, global = true, value_parser, default_value = DEFAULT_KEYS_FILE)]
    pub keys_file: PathBuf,

    /// Total page fetch timeout in seconds
    #[arg(long, global = true, default_value_t = FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_seconds: u64,

    /// Per-provider LLM timeout in seconds
    #[arg(long, global = true, default_value_t = PROVIDER_TIMEOUT_SECS)]
    pub provider_timeout_seconds: u64,

    /// HTTP User-Agent header value for page fetches
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Gemini model name
    #[arg(long, global = true, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// ChatGPT model name
    #[arg(long, global = true, env = "CHATGPT_MODEL", default_value = DEFAULT_CHATGPT_MODEL)]
    pub chatgpt_model: String,

    /// Gemini API base URL
    #[arg(long, global = true, env = "GEMINI_BASE_URL", default_value = GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// OpenAI API base URL
    #[arg(long, global = true, env = "CHATGPT_BASE_URL", default_value = CHATGPT_BASE_URL)]
    pub chatgpt_base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do once configured.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a single URL and print the verdicts as JSON
    Analyze {
        /// URL to analyze (https:// is assumed when no scheme is given)
        url: String,

        /// Providers to consult: gemini|chatgpt|both
        #[arg(long, default_value = "both")]
        mode: Mode,
    },
    /// Serve POST /analyze on 127.0.0.1
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
            keys_file: opt.keys_file.clone(),
            fetch_timeout_seconds: opt.fetch_timeout_seconds,
            provider_timeout_seconds: opt.provider_timeout_seconds,
            user_agent: opt.user_agent.clone(),
            gemini_model: opt.gemini_model.clone(),
            chatgpt_model: opt.chatgpt_model.clone(),
            gemini_base_url: opt.gemini_base_url.clone(),
            chatgpt_base_url: opt.chatgpt_base_url.clone(),
        }
    }
}
