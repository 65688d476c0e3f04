//! Yahoo Finance quoteSummary response models.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Vec<YahooQuoteSummaryResult>,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
}

/// Price module of the quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
    pub regular_market_time: Option<i64>,
}

/// Yahoo wraps numbers as {"raw": 1.0, "fmt": "1.00"}, or {} when absent.
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
}
