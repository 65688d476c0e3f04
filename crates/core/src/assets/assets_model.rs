//! Asset domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ASSET_TYPE, DEFAULT_CURRENCY, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::{Error, Result};

/// A tradable instrument. Immutable once created; `symbol` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub currency: String,
    pub asset_type: String,
    pub created_at: NaiveDateTime,
}

/// Input model for registering an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAsset {
    pub symbol: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
}

impl NewAsset {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            exchange: None,
            currency: None,
            asset_type: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::invalid_input("Asset symbol cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Asset name cannot be empty"));
        }
        if let Some(currency) = &self.currency {
            if currency.trim().is_empty() {
                return Err(Error::invalid_input("Currency cannot be empty"));
            }
        }
        Ok(())
    }

    /// Canonical form persisted by the repository: trimmed, upper-cased symbol
    /// and currency, defaults applied, blank exchange dropped.
    pub fn normalized(self) -> Self {
        let currency = self
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let asset_type = self
            .asset_type
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_ASSET_TYPE.to_string());

        Self {
            symbol: normalize_symbol(&self.symbol),
            name: self.name.trim().to_string(),
            exchange: self
                .exchange
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            currency: Some(currency),
            asset_type: Some(asset_type),
        }
    }
}

pub(crate) fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Live price of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPrice {
    pub symbol: String,
    pub price: Decimal,
}

/// Query for symbol search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSearchQuery {
    pub q: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl AssetSearchQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Validates and returns the trimmed query and effective limit.
    pub fn resolve(&self) -> Result<(String, usize)> {
        let query = self.q.trim();
        if query.is_empty() {
            return Err(Error::invalid_input("Search query cannot be empty"));
        }
        let limit = self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(Error::invalid_input(format!(
                "Search limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }
        Ok((query.to_string(), limit))
    }
}
