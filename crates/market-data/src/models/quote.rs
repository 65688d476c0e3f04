use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Latest market price for a symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the provider answered for
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Closing/current price (required)
    pub close: Decimal,

    /// Quote currency
    pub currency: String,

    /// Source of the quote (YAHOO, STATIC, etc.)
    pub source: String,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        close: Decimal,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close,
            currency: currency.into(),
            source: source.into(),
        }
    }

    /// Rejects quotes whose price cannot be used for valuation.
    pub fn validate(self) -> Result<Self, MarketDataError> {
        if self.close <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!(
                    "non-positive close {} for {} from {}",
                    self.close, self.symbol, self.source
                ),
            });
        }
        Ok(self)
    }
}
