//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Quote, SearchResult};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new price source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use driftfolio_market_data::{MarketDataProvider, ProviderCapabilities, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities { supports_search: false }
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement get_latest_quote
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    fn id(&self) -> &'static str;

    /// Callers skip `search` when `supports_search` is false.
    fn capabilities(&self) -> ProviderCapabilities;

    fn rate_limit(&self) -> RateLimit;

    /// Fetch the latest quote for a ticker symbol.
    ///
    /// Returns `SymbolNotFound` when the provider has no price for the symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Search for symbols matching the query.
    ///
    /// Default implementation returns `NotSupported`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }
}
