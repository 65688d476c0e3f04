//! Database models for portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use driftfolio_core::portfolios::{Portfolio, PortfolioItem};

use crate::errors::StorageError;
use crate::utils::parse_decimal;

/// Database model for portfolios. Amounts are stored as TEXT to keep full
/// decimal precision.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub initial_invest_amount: String,
    pub created_at: NaiveDateTime,
}

#[derive(
    Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
#[diesel(table_name = crate::schema::portfolio_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioItemDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    /// Insertion index within the portfolio; items are listed by it.
    pub position: i32,
    pub target_weight: String,
    pub tolerance: String,
    pub entry_price: String,
    pub initial_quantity: String,
    pub current_quantity: String,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Portfolio> for PortfolioDB {
    fn from(domain: Portfolio) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            name: domain.name,
            description: domain.description,
            initial_invest_amount: domain.initial_invest_amount.to_string(),
            created_at: domain.created_at,
        }
    }
}

impl TryFrom<PortfolioDB> for Portfolio {
    type Error = StorageError;

    fn try_from(db: PortfolioDB) -> Result<Self, Self::Error> {
        Ok(Self {
            initial_invest_amount: parse_decimal(
                &db.initial_invest_amount,
                "initial_invest_amount",
            )?,
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            created_at: db.created_at,
        })
    }
}

impl PortfolioItemDB {
    pub fn from_domain(item: PortfolioItem, position: i32) -> Self {
        Self {
            id: item.id,
            portfolio_id: item.portfolio_id,
            asset_id: item.asset_id,
            position,
            target_weight: item.target_weight.to_string(),
            tolerance: item.tolerance.to_string(),
            entry_price: item.entry_price.to_string(),
            initial_quantity: item.initial_quantity.to_string(),
            current_quantity: item.current_quantity.to_string(),
            version: item.version,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl TryFrom<PortfolioItemDB> for PortfolioItem {
    type Error = StorageError;

    fn try_from(db: PortfolioItemDB) -> Result<Self, Self::Error> {
        Ok(Self {
            target_weight: parse_decimal(&db.target_weight, "target_weight")?,
            tolerance: parse_decimal(&db.tolerance, "tolerance")?,
            entry_price: parse_decimal(&db.entry_price, "entry_price")?,
            initial_quantity: parse_decimal(&db.initial_quantity, "initial_quantity")?,
            current_quantity: parse_decimal(&db.current_quantity, "current_quantity")?,
            id: db.id,
            portfolio_id: db.portfolio_id,
            asset_id: db.asset_id,
            version: db.version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
