use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::analysis_errors::AnalysisError;
use crate::errors::Error;

/// How items without a live price are valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPricePolicy {
    /// Report the item as `unavailable` and leave it out of the total value.
    #[default]
    Exclude,
    /// Value the item at its entry price and flag it with a `missing_price` issue.
    #[serde(rename = "entry_price")]
    EntryPriceFallback,
}

impl FromStr for MissingPricePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "entry_price" | "entry-price" | "fallback" => Ok(Self::EntryPriceFallback),
            other => Err(Error::invalid_input(format!(
                "Unknown missing price policy '{}' (expected 'exclude' or 'entry_price')",
                other
            ))),
        }
    }
}

impl fmt::Display for MissingPricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclude => f.write_str("exclude"),
            Self::EntryPriceFallback => f.write_str("entry_price"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Live,
    EntryPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InRange,
    Warning,
    Danger,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    MissingPrice,
    InvalidEntryPrice,
    ValueOverflow,
}

/// Non-fatal problem attached to a single analyzed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIssue {
    pub code: IssueCode,
    pub message: String,
}

impl ItemIssue {
    pub fn missing_price(asset_id: &str, symbol: &str) -> Self {
        let err = AnalysisError::MissingPrice {
            asset_id: asset_id.to_string(),
            symbol: symbol.to_string(),
        };
        Self {
            code: IssueCode::MissingPrice,
            message: err.to_string(),
        }
    }

    pub fn value_overflow(item_id: &str, quantity: Decimal, price: Decimal) -> Self {
        let err = AnalysisError::ValueOverflow {
            item_id: item_id.to_string(),
            quantity,
            price,
        };
        Self {
            code: IssueCode::ValueOverflow,
            message: err.to_string(),
        }
    }

    pub fn invalid_entry_price(item_id: &str, entry_price: Decimal) -> Self {
        let err = AnalysisError::InvalidEntryPrice {
            item_id: item_id.to_string(),
            entry_price,
        };
        Self {
            code: IssueCode::InvalidEntryPrice,
            message: err.to_string(),
        }
    }
}

/// Per-item analysis result.
///
/// Valuation fields are `None` when the item could not be priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalysis {
    pub item_id: String,
    pub asset_id: String,
    pub symbol: String,
    pub name: String,
    pub target_weight: Decimal,
    pub tolerance: Decimal,
    pub entry_price: Decimal,
    pub current_quantity: Decimal,
    pub current_price: Option<Decimal>,
    pub price_source: Option<PriceSource>,
    pub current_value: Option<Decimal>,
    pub current_weight: Option<Decimal>,
    pub weight_diff: Option<Decimal>,
    pub is_out_of_range: bool,
    pub status: ItemStatus,
    pub return_pct: Option<Decimal>,
    /// Value the item would have at exactly its target weight.
    pub target_value: Option<Decimal>,
    /// Units to buy (positive) or sell (negative) to reach `target_value`.
    pub rebalance_quantity: Option<Decimal>,
    pub issues: Vec<ItemIssue>,
}

/// Portfolio-level analysis. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub portfolio_id: String,
    pub portfolio_name: String,
    pub initial_invest_amount: Decimal,
    pub total_value: Decimal,
    pub total_return: Decimal,
    pub total_return_pct: Decimal,
    pub out_of_range_count: usize,
    pub unavailable_count: usize,
    pub needs_rebalance: bool,
    pub missing_price_policy: MissingPricePolicy,
    pub items: Vec<ItemAnalysis>,
}
