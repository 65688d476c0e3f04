//! Portfolio repository and service traits.

use async_trait::async_trait;

use super::portfolios_model::{
    ItemQuantityUpdate, NewPortfolio, Portfolio, PortfolioDetail, PortfolioItem,
};
use crate::analysis::PortfolioAnalysis;
use crate::errors::Result;

/// Persistence contract for portfolios and their items.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Persists a portfolio and all of its items in one transaction.
    async fn create(&self, portfolio: Portfolio, items: Vec<PortfolioItem>) -> Result<Portfolio>;

    /// Returns `Error::NotFound` when the portfolio does not exist.
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Portfolio>>;

    /// Items in creation order.
    fn list_items(&self, portfolio_id: &str) -> Result<Vec<PortfolioItem>>;

    /// Sets `current_quantity` and bumps `version`.
    ///
    /// Fails with `Error::Conflict` when `expected_version` is set and differs
    /// from the stored version.
    async fn update_item_quantity(
        &self,
        portfolio_id: &str,
        item_id: &str,
        update: ItemQuantityUpdate,
    ) -> Result<PortfolioItem>;

    /// Deletes the portfolio and its items. Returns the number of deleted portfolios.
    async fn delete(&self, portfolio_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(
        &self,
        user_id: &str,
        new_portfolio: NewPortfolio,
    ) -> Result<PortfolioDetail>;

    fn list_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>>;

    fn get_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<PortfolioDetail>;

    async fn update_item_quantity(
        &self,
        user_id: &str,
        portfolio_id: &str,
        item_id: &str,
        update: ItemQuantityUpdate,
    ) -> Result<PortfolioItem>;

    async fn delete_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<()>;

    /// Analyzes the portfolio against a freshly fetched price snapshot.
    async fn analyze_portfolio(&self, user_id: &str, portfolio_id: &str)
        -> Result<PortfolioAnalysis>;
}
