//! Tests for QuoteService price lookup and search.

#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::quotes::{QuoteService, QuoteServiceTrait};
    use async_trait::async_trait;
    use chrono::Utc;
    use driftfolio_market_data::{
        MarketDataError, MarketDataProvider, ProviderCapabilities, Quote, RateLimit, SearchResult,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // =========================================================================
    // Mock provider
    // =========================================================================

    #[derive(Default)]
    struct MockProvider {
        prices: HashMap<String, Decimal>,
        failing: Vec<String>,
        calls: AtomicUsize,
        max_concurrency: Option<usize>,
        search_disabled: bool,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl MockProvider {
        fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
            self.prices.insert(symbol.to_string(), price);
            self
        }

        fn failing_on(mut self, symbol: &str) -> Self {
            self.failing.push(symbol.to_string());
            self
        }

        fn limited_to(mut self, max_concurrency: usize) -> Self {
            self.max_concurrency = Some(max_concurrency);
            self
        }

        fn without_search(mut self) -> Self {
            self.search_disabled = true;
            self
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                supports_search: !self.search_disabled,
            }
        }

        fn rate_limit(&self) -> RateLimit {
            match self.max_concurrency {
                Some(max_concurrency) => RateLimit { max_concurrency },
                None => RateLimit::default(),
            }
        }

        async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            // Stay pending once so sibling lookups overlap with this one.
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.iter().any(|s| s == symbol) {
                return Err(MarketDataError::Timeout {
                    provider: "MOCK".to_string(),
                });
            }
            self.prices
                .get(symbol)
                .map(|price| Quote::new(symbol, Utc::now(), *price, "USD", "MOCK"))
                .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
        }

        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
            Ok(self
                .prices
                .keys()
                .filter(|s| s.contains(&query.to_uppercase()))
                .map(|s| SearchResult::new(s, format!("{} Inc", s), "NASDAQ", "EQUITY"))
                .collect())
        }
    }

    fn service(provider: MockProvider) -> (QuoteService, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        (QuoteService::new(provider.clone()), provider)
    }

    // =========================================================================
    // get_latest_price
    // =========================================================================

    #[tokio::test]
    async fn test_latest_price_found() {
        let (svc, _) = service(MockProvider::default().with_price("AAPL", dec!(190.5)));
        assert_eq!(svc.get_latest_price("AAPL").await.unwrap(), Some(dec!(190.5)));
    }

    #[tokio::test]
    async fn test_latest_price_unknown_symbol_is_none() {
        let (svc, _) = service(MockProvider::default());
        assert_eq!(svc.get_latest_price("NOPE").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_positive_price_is_treated_as_missing() {
        let (svc, _) = service(
            MockProvider::default()
                .with_price("ZERO", dec!(0))
                .with_price("NEG", dec!(-3)),
        );
        assert_eq!(svc.get_latest_price("ZERO").await.unwrap(), None);
        assert_eq!(svc.get_latest_price("NEG").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transient_failure_is_service_unavailable() {
        let (svc, _) = service(MockProvider::default().failing_on("SLOW"));
        let err = svc.get_latest_price("SLOW").await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    // =========================================================================
    // get_latest_prices
    // =========================================================================

    #[tokio::test]
    async fn test_latest_prices_snapshot_omits_failures() {
        let (svc, provider) = service(
            MockProvider::default()
                .with_price("AAPL", dec!(190))
                .with_price("MSFT", dec!(410))
                .failing_on("SLOW"),
        );
        let symbols = vec![
            "AAPL".to_string(),
            "MSFT".to_string(),
            "AAPL".to_string(),
            "SLOW".to_string(),
            "NOPE".to_string(),
        ];

        let prices = svc.get_latest_prices(&symbols).await;

        assert_eq!(prices.len(), 2);
        assert_eq!(prices["AAPL"], dec!(190));
        assert_eq!(prices["MSFT"], dec!(410));
        // Duplicates are fetched once.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_latest_prices_respect_provider_concurrency() {
        let mut provider = MockProvider::default().limited_to(3);
        let symbols: Vec<String> = (0..12).map(|i| format!("SYM{}", i)).collect();
        for symbol in &symbols {
            provider = provider.with_price(symbol, dec!(10));
        }
        let (svc, provider) = service(provider);

        let prices = svc.get_latest_prices(&symbols).await;

        assert_eq!(prices.len(), 12);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 12);
        let peak = provider.peak_in_flight.load(Ordering::SeqCst);
        assert!((1..=3).contains(&peak), "peak concurrency was {}", peak);
    }

    #[tokio::test]
    async fn test_latest_prices_empty_input() {
        let (svc, provider) = service(MockProvider::default());
        assert!(svc.get_latest_prices(&[]).await.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    // =========================================================================
    // search
    // =========================================================================

    #[tokio::test]
    async fn test_search_truncates_and_maps() {
        let (svc, _) = service(
            MockProvider::default()
                .with_price("VOO", dec!(500))
                .with_price("VOOG", dec!(300))
                .with_price("VOOV", dec!(180)),
        );
        let results = svc.search("voo", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.symbol.starts_with("VOO"));
            assert_eq!(result.exchange.as_deref(), Some("NASDAQ"));
            assert_eq!(result.asset_type.as_deref(), Some("equity"));
            assert!(result.current_price.is_none());
        }
    }

    #[tokio::test]
    async fn test_search_unsupported_by_provider() {
        let (svc, _) = service(
            MockProvider::default()
                .with_price("VOO", dec!(500))
                .without_search(),
        );
        let err = svc.search("voo", 5).await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
        assert!(err.to_string().contains("MOCK"));
    }
}
