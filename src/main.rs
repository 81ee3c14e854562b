//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `phish_detector` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output and exit codes
//!
//! All core functionality is implemented in the library crate.

use std::net::{Ipv4Addr, SocketAddr};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use phish_detector::config::{Command, Opt};
use phish_detector::initialization::init_logger_with;
use phish_detector::server::{start_server, ServerState};
use phish_detector::{AnalysisError, Config, Orchestrator, Secrets};

const EXIT_VALIDATION: i32 = 2;
const EXIT_CONFIGURATION: i32 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // so GEMINI_API / CHATGPT_API can be set there instead of keys.txt
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    let config = Config::from(&opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = config.validate() {
        eprintln!("phish_detector: {e}");
        process::exit(EXIT_CONFIGURATION);
    }

    let secrets = Arc::new(Secrets::load(&config.keys_file));
    log_provider_availability(&secrets);

    let orchestrator = Arc::new(
        Orchestrator::from_config(&config, secrets).context("Failed to initialize HTTP clients")?,
    );

    match opt.command {
        Command::Analyze { url, mode } => match orchestrator.analyze(&url, mode).await {
            Ok(result) => {
                let json = serde_json::to_string_pretty(&result)
                    .context("Failed to serialize result")?;
                println!("{json}");
                Ok(())
            }
            Err(e @ AnalysisError::Validation(_)) => {
                eprintln!("phish_detector: {e}");
                process::exit(EXIT_VALIDATION);
            }
            Err(e @ AnalysisError::Configuration(_)) => {
                eprintln!("phish_detector: {e}");
                process::exit(EXIT_CONFIGURATION);
            }
        },
        Command::Serve { port } => {
            let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
            start_server(addr, ServerState::new(orchestrator)).await
        }
    }
}

fn log_provider_availability(secrets: &Secrets) {
    let configured = secrets.configured();
    if configured.is_empty() {
        warn!("No API keys configured (GEMINI_API / CHATGPT_API): every analysis will fail");
        return;
    }
    let names: Vec<String> = configured.iter().map(ToString::to_string).collect();
    info!("Providers available: {}", names.join(", "));
}
