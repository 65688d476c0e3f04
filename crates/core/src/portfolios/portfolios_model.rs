//! Portfolio domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::assets::Asset;
use crate::constants::{
    DEFAULT_TOLERANCE, MAX_INVEST_AMOUNT, MAX_QUANTITY, MAX_TARGET_WEIGHT, MAX_TOLERANCE,
    ONE_HUNDRED, WEIGHT_SUM_TOLERANCE,
};
use crate::{Error, Result};

/// A user's portfolio. `initial_invest_amount` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub initial_invest_amount: Decimal,
    pub created_at: NaiveDateTime,
}

/// A target allocation within a portfolio.
///
/// `entry_price` and `initial_quantity` are fixed at creation. Only
/// `current_quantity` changes afterwards, bumping `version` each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub target_weight: Decimal,
    pub tolerance: Decimal,
    pub entry_price: Decimal,
    pub initial_quantity: Decimal,
    pub current_quantity: Decimal,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItemDetail {
    #[serde(flatten)]
    pub item: PortfolioItem,
    pub asset: Asset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDetail {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub items: Vec<PortfolioItemDetail>,
}

fn default_tolerance() -> Decimal {
    DEFAULT_TOLERANCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPortfolioItem {
    pub asset_id: String,
    pub target_weight: Decimal,
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

impl NewPortfolioItem {
    pub fn new(asset_id: impl Into<String>, target_weight: Decimal) -> Self {
        Self {
            asset_id: asset_id.into(),
            target_weight,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.asset_id.trim().is_empty() {
            return Err(Error::invalid_input("Asset ID cannot be empty"));
        }
        if self.target_weight <= Decimal::ZERO || self.target_weight > MAX_TARGET_WEIGHT {
            return Err(Error::invalid_input(format!(
                "Target weight for asset {} must be greater than 0 and at most 100, got {}",
                self.asset_id, self.target_weight
            )));
        }
        if self.tolerance < Decimal::ZERO || self.tolerance > MAX_TOLERANCE {
            return Err(Error::invalid_input(format!(
                "Tolerance for asset {} must be between 0 and 50, got {}",
                self.asset_id, self.tolerance
            )));
        }
        Ok(())
    }
}

/// Input model for creating a portfolio with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPortfolio {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub initial_invest_amount: Decimal,
    pub items: Vec<NewPortfolioItem>,
}

impl NewPortfolio {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Portfolio name cannot be empty"));
        }
        if self.initial_invest_amount <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "Initial investment amount must be greater than 0",
            ));
        }
        if self.initial_invest_amount > MAX_INVEST_AMOUNT {
            return Err(Error::invalid_input(format!(
                "Initial investment amount cannot exceed {}",
                MAX_INVEST_AMOUNT
            )));
        }
        if self.items.is_empty() {
            return Err(Error::invalid_input(
                "Portfolio must contain at least one item",
            ));
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            item.validate()?;
            if !seen.insert(item.asset_id.as_str()) {
                return Err(Error::invalid_input(format!(
                    "Asset {} appears more than once",
                    item.asset_id
                )));
            }
        }

        let total: Decimal = self.items.iter().map(|i| i.target_weight).sum();
        if (total - ONE_HUNDRED).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::invalid_input(format!(
                "Target weights must sum to 100%. Current sum: {:.2}%",
                total
            )));
        }
        Ok(())
    }
}

/// Update of a single item's holding.
///
/// With `expected_version` set, the update only applies if the stored item is
/// still at that version; otherwise the last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuantityUpdate {
    pub current_quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i32>,
}

impl ItemQuantityUpdate {
    pub fn new(current_quantity: Decimal) -> Self {
        Self {
            current_quantity,
            expected_version: None,
        }
    }

    pub fn expecting_version(mut self, version: i32) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.current_quantity < Decimal::ZERO {
            return Err(Error::invalid_input("Current quantity cannot be negative"));
        }
        if self.current_quantity > MAX_QUANTITY {
            return Err(Error::invalid_input(format!(
                "Current quantity cannot exceed {}",
                MAX_QUANTITY
            )));
        }
        Ok(())
    }
}
