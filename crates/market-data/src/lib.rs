//! Driftfolio Market Data Crate
//!
//! Provider-agnostic access to live market prices and symbol search.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +----------------------+     +-------------+
//! |   Core services  | --> |  MarketDataProvider  | --> |   Quote /   |
//! | (quotes facade)  |     |  (Yahoo, test stubs) |     | SearchResult|
//! +------------------+     +----------------------+     +-------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - Trait every price source implements
//! - [`Quote`] - Latest price observation for a symbol
//! - [`SearchResult`] - Symbol lookup hit
//! - [`MarketDataError`](errors::MarketDataError) - Error taxonomy for provider failures

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{ProviderId, Quote, SearchResult};
pub use provider::yahoo::YahooProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
