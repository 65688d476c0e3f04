#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use driftfolio_market_data::{
    MarketDataError, MarketDataProvider, ProviderCapabilities, Quote, RateLimit, SearchResult,
};
use driftfolio_server::{api::app_router, build_state_with_provider, config::Config};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// In-memory price source whose prices tests can change between requests.
#[derive(Default)]
pub struct StaticProvider {
    prices: RwLock<HashMap<String, Decimal>>,
}

impl StaticProvider {
    pub fn with_prices(prices: &[(&str, Decimal)]) -> Arc<Self> {
        let provider = Self::default();
        for (symbol, price) in prices {
            provider.set_price(symbol, *price);
        }
        Arc::new(provider)
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices
            .write()
            .unwrap()
            .insert(symbol.to_string(), price);
    }

    pub fn remove_price(&self, symbol: &str) {
        self.prices.write().unwrap().remove(symbol);
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    fn id(&self) -> &'static str {
        "STATIC"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_search: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let price = self.prices.read().unwrap().get(symbol).copied();
        price
            .map(|p| Quote::new(symbol, Utc::now(), p, "USD", "STATIC"))
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let query = query.to_uppercase();
        let mut symbols: Vec<String> = self
            .prices
            .read()
            .unwrap()
            .keys()
            .filter(|s| s.contains(&query))
            .cloned()
            .collect();
        symbols.sort();
        Ok(symbols
            .into_iter()
            .map(|s| SearchResult::new(s.clone(), format!("{} Corp", s), "NASDAQ", "EQUITY"))
            .collect())
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<StaticProvider>,
    pub config: Config,
    _dir: TempDir,
}

pub async fn spawn_app(prices: &[(&str, Decimal)]) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_db_path(dir.path().join("test.db").to_string_lossy());
    let provider = StaticProvider::with_prices(prices);
    let state = build_state_with_provider(&config, provider.clone())
        .await
        .unwrap();
    let router = app_router(state, &config);
    TestApp {
        router,
        provider,
        config,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    /// Signs a user up and returns a bearer token for them.
    pub async fn login_as(&self, email: &str) -> String {
        let credentials = serde_json::json!({ "email": email, "password": "secret123" });
        let (status, _) = self
            .request(Method::POST, "/api/auth/signup", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self
            .request(Method::POST, "/api/auth/login", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Registers an asset and returns its id.
    pub async fn create_asset(&self, token: &str, symbol: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/assets",
                Some(token),
                Some(serde_json::json!({ "symbol": symbol, "name": format!("{symbol} Corp") })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}
