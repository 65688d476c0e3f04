use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use driftfolio_market_data::SearchResult;

/// A symbol search hit, optionally enriched with its live price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub asset_type: Option<String>,
    pub current_price: Option<Decimal>,
}

impl From<SearchResult> for SymbolSearchResult {
    fn from(result: SearchResult) -> Self {
        let non_empty = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };
        Self {
            symbol: result.symbol,
            name: result.name,
            exchange: non_empty(result.exchange),
            asset_type: non_empty(result.asset_type).map(|t| t.to_lowercase()),
            current_price: None,
        }
    }
}
