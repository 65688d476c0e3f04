use rust_decimal::Decimal;
use thiserror::Error;

/// Conditions raised while analyzing a portfolio.
///
/// `InvalidInvestment` and `ValueOutOfRange` abort an analysis. The per-item variants are
/// reported on the affected item as an [`ItemIssue`](super::ItemIssue).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No price available for {symbol} (asset {asset_id})")]
    MissingPrice { asset_id: String, symbol: String },

    #[error("Item {item_id} has a non-positive entry price {entry_price}")]
    InvalidEntryPrice {
        item_id: String,
        entry_price: Decimal,
    },

    #[error("Value of item {item_id} ({quantity} at {price}) exceeds the supported range")]
    ValueOverflow {
        item_id: String,
        quantity: Decimal,
        price: Decimal,
    },

    #[error("Initial investment must be positive, got {0}")]
    InvalidInvestment(Decimal),

    #[error("Portfolio {0} exceeds the supported range")]
    ValueOutOfRange(String),
}
