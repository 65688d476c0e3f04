use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use driftfolio_market_data::{MarketDataError, MarketDataProvider};

use super::quotes_model::SymbolSearchResult;
use super::quotes_traits::QuoteServiceTrait;
use crate::errors::{Error, Result};

pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_latest_price(&self, symbol: &str) -> Result<Option<Decimal>> {
        match self.provider.get_latest_quote(symbol).await {
            Ok(quote) if quote.close > Decimal::ZERO => Ok(Some(quote.close)),
            Ok(quote) => {
                warn!(
                    "Ignoring non-positive price {} for {} from {}",
                    quote.close, symbol, quote.source
                );
                Ok(None)
            }
            Err(e @ (MarketDataError::SymbolNotFound(_) | MarketDataError::ValidationFailed { .. })) => {
                debug!("No price for {}: {}", symbol, e);
                Ok(None)
            }
            Err(e) => Err(Error::ServiceUnavailable(format!(
                "Price lookup for {} failed: {}",
                symbol, e
            ))),
        }
    }

    async fn get_latest_prices(&self, symbols: &[String]) -> HashMap<String, Decimal> {
        let distinct: BTreeSet<&str> = symbols.iter().map(String::as_str).collect();
        let max_concurrency = self.provider.rate_limit().max_concurrency.max(1);

        let lookups: Vec<_> = distinct
            .into_iter()
            .map(|symbol| async move { (symbol, self.get_latest_price(symbol).await) })
            .collect();
        let results: Vec<(&str, Result<Option<Decimal>>)> = stream::iter(lookups)
            .buffer_unordered(max_concurrency)
            .collect()
            .await;

        let mut prices = HashMap::new();
        for (symbol, result) in results {
            match result {
                Ok(Some(price)) => {
                    prices.insert(symbol.to_string(), price);
                }
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            }
        }
        prices
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SymbolSearchResult>> {
        if !self.provider.capabilities().supports_search {
            return Err(Error::ServiceUnavailable(format!(
                "Symbol search is not supported by {}",
                self.provider.id()
            )));
        }

        let results = self.provider.search(query).await.map_err(|e| {
            Error::ServiceUnavailable(format!("Symbol search for '{}' failed: {}", query, e))
        })?;

        Ok(results
            .into_iter()
            .take(limit)
            .map(SymbolSearchResult::from)
            .collect())
    }
}
