//! Yahoo Finance market data provider.
//!
//! Latest prices come from the chart API through `yahoo_finance_api`, with the
//! quoteSummary endpoint as a backup. Symbol search uses the ticker search API.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{Quote, SearchResult};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

use models::YahooQuoteSummaryResponse;

const PROVIDER_ID: &str = "YAHOO";
const DEFAULT_CURRENCY: &str = "USD";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

fn provider_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    http: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| provider_error(format!("Failed to initialize Yahoo connector: {}", e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { connector, http })
    }

    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Ok(guard) = YAHOO_CRUMB.read() {
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }
        self.fetch_crumb().await
    }

    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let response = self
            .http
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie"))?;

        let crumb = self
            .http
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| provider_error(format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = Some(crumb_data.clone());
        }
        Ok(crumb_data)
    }

    fn clear_crumb(&self) {
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = None;
        }
    }

    // ========================================================================
    // Quote Fetching
    // ========================================================================

    fn yahoo_quote_to_quote(
        symbol: &str,
        yahoo_quote: yahoo::Quote,
    ) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        let close = Decimal::from_f64_retain(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!(
                    "Failed to convert close price {} to Decimal",
                    yahoo_quote.close
                ),
            }
        })?;

        Quote::new(symbol, timestamp, close, DEFAULT_CURRENCY, PROVIDER_ID).validate()
    }

    /// Chart API through the library connector.
    async fn fetch_latest_quote_primary(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    provider_error(e.to_string())
                }
            })?;

        let yahoo_quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        Self::yahoo_quote_to_quote(symbol, yahoo_quote)
    }

    /// quoteSummary price module.
    async fn fetch_latest_quote_backup(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let crumb = self.ensure_crumb().await?;
        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| provider_error(format!("Backup quote request failed: {}", e)))?;

        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(provider_error("Yahoo authentication expired"));
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            reqwest::StatusCode::NOT_FOUND => {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            provider_error(format!("Failed to parse backup quote response: {}", e))
        })?;

        let price = data
            .quote_summary
            .result
            .into_iter()
            .next()
            .and_then(|r| r.price)
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        let close = price
            .regular_market_price
            .as_ref()
            .and_then(|p| p.raw)
            .and_then(Decimal::from_f64_retain)
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: "No valid price in backup response".to_string(),
            })?;

        let timestamp = price
            .regular_market_time
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Quote::new(
            price.symbol.unwrap_or_else(|| symbol.to_string()),
            timestamp,
            close,
            price.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            PROVIDER_ID,
        )
        .validate()
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_search: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit { max_concurrency: 10 }
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        match self.fetch_latest_quote_primary(symbol).await {
            Ok(quote) => return Ok(quote),
            Err(e) => {
                debug!(
                    "Primary quote fetch failed for {}: {}, trying backup",
                    symbol, e
                );
            }
        }

        self.fetch_latest_quote_backup(symbol).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        debug!("Searching Yahoo for '{}'", query);
        let encoded_query = encode(query);

        let result = self
            .connector
            .search_ticker(&encoded_query)
            .await
            .map_err(|e| provider_error(e.to_string()))?;

        let search_results = result
            .quotes
            .iter()
            .map(|item| {
                let name = format_name(Some(&item.long_name), Some(&item.short_name), &item.symbol);
                SearchResult::new(&item.symbol, name, &item.exchange, &item.quote_type)
                    .with_score(item.score)
            })
            .collect();

        Ok(search_results)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Prefer the long name, falling back to the short name and then the symbol.
fn format_name(long_name: Option<&str>, short_name: Option<&str>, symbol: &str) -> String {
    let name = long_name.unwrap_or("").trim().replace("&amp;", "&");
    if !name.is_empty() {
        return name;
    }
    match short_name.map(str::trim) {
        Some(short) if !short.is_empty() => short.to_string(),
        _ => symbol.to_string(),
    }
}
