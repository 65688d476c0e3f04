//! Provider capabilities and rate limiting configuration.

/// Describes what a market data provider can do.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Whether the provider supports symbol/asset search.
    pub supports_search: bool,
}

/// Rate limiting configuration for a provider.
///
/// `max_concurrency` bounds how many price lookups the quote facade
/// issues against this provider at once.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum concurrent requests to this provider.
    pub max_concurrency: usize,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self { max_concurrency: 5 }
    }
}
