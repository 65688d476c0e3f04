use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::quotes_model::SymbolSearchResult;
use crate::errors::Result;

/// Facade over the market data provider used by the asset and portfolio services.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Latest positive price for `symbol`, or `None` when the provider has none.
    async fn get_latest_price(&self, symbol: &str) -> Result<Option<Decimal>>;

    /// Fetches all symbols concurrently, at most the provider's
    /// `max_concurrency` at a time, and returns the completed snapshot.
    /// Symbols that fail or have no price are absent from the map.
    async fn get_latest_prices(&self, symbols: &[String]) -> HashMap<String, Decimal>;

    /// Symbol search truncated to `limit` results, without prices.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SymbolSearchResult>>;
}
