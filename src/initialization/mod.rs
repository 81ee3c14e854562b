//! Application initialization and resource setup.
//!
//! Builds the shared resources used by every request:
//! - HTTP clients (page fetch and provider API)
//! - Logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::{init_fetch_client, init_provider_client};
pub use logger::init_logger_with;
