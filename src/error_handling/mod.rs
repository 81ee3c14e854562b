//! Error handling.
//!
//! This module provides:
//! - Error type definitions for every stage of an analysis
//! - Categorization of transport failures and upstream statuses
//!
//! Propagation policy:
//! - **ValidationError** aborts the whole request
//! - **FetchError** degrades: analysis continues without page content
//! - **ProviderError** and **ParseError** are confined to one provider's slot

mod categorization;
mod types;

// Re-export public API
pub use categorization::{
    categorize_fetch_error, categorize_provider_status, categorize_provider_transport,
    truncate_for_message,
};
pub use types::{
    AnalysisError, FetchError, InitializationError, ParseError, ProviderError, ValidationError,
};
