//! Error types for the tickercal ecosystem.

use thiserror::Error;

/// Errors that can occur in tickercal operations.
#[derive(Error, Debug)]
pub enum TickerCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Data source error: {0}")]
    Source(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for tickercal operations.
pub type TickerCalResult<T> = Result<T, TickerCalError>;
