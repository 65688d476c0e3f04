//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider returned data that failed validation checks
    /// (missing close, non-positive price, bad timestamp).
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// The provider does not implement the requested operation.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported { operation: String, provider: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// True when the provider positively reported that it has no price for the symbol.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_))
    }
}
