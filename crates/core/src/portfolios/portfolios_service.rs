use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::portfolios_model::{
    ItemQuantityUpdate, NewPortfolio, Portfolio, PortfolioDetail, PortfolioItem,
    PortfolioItemDetail,
};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::analysis::{analyze, AnalysisError, MissingPricePolicy, PortfolioAnalysis};
use crate::assets::{Asset, AssetRepositoryTrait};
use crate::constants::{MAX_QUANTITY, ONE_HUNDRED};
use crate::errors::{Error, Result};
use crate::quotes::QuoteServiceTrait;

/// Service for portfolio lifecycle and analysis.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    missing_price_policy: MissingPricePolicy,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
        missing_price_policy: MissingPricePolicy,
    ) -> Self {
        Self {
            repository,
            asset_repository,
            quote_service,
            missing_price_policy,
        }
    }

    /// Loads a portfolio, hiding other users' portfolios behind `NotFound`.
    fn get_owned(&self, user_id: &str, portfolio_id: &str) -> Result<Portfolio> {
        let portfolio = self.repository.get_by_id(portfolio_id)?;
        if portfolio.user_id != user_id {
            debug!(
                "User {} requested portfolio {} owned by another user",
                user_id, portfolio_id
            );
            return Err(Error::NotFound(format!("Portfolio {}", portfolio_id)));
        }
        Ok(portfolio)
    }

    fn load_detail(&self, portfolio: Portfolio) -> Result<PortfolioDetail> {
        let items = self.repository.list_items(&portfolio.id)?;
        let asset_ids: Vec<String> = items.iter().map(|i| i.asset_id.clone()).collect();
        let assets: HashMap<String, Asset> = self
            .asset_repository
            .list_by_ids(&asset_ids)?
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        let items = items
            .into_iter()
            .map(|item| {
                let asset = assets
                    .get(&item.asset_id)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(format!("Asset {}", item.asset_id)))?;
                Ok(PortfolioItemDetail { item, asset })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PortfolioDetail { portfolio, items })
    }

    /// Fetches the live price of every item, keyed by asset id.
    async fn price_snapshot(&self, items: &[PortfolioItemDetail]) -> HashMap<String, Decimal> {
        let symbols: Vec<String> = items.iter().map(|d| d.asset.symbol.clone()).collect();
        let by_symbol = self.quote_service.get_latest_prices(&symbols).await;
        items
            .iter()
            .filter_map(|d| {
                by_symbol
                    .get(&d.asset.symbol)
                    .map(|price| (d.item.asset_id.clone(), *price))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(
        &self,
        user_id: &str,
        new_portfolio: NewPortfolio,
    ) -> Result<PortfolioDetail> {
        new_portfolio.validate()?;

        let assets = new_portfolio
            .items
            .iter()
            .map(|item| self.asset_repository.get_by_id(&item.asset_id))
            .collect::<Result<Vec<Asset>>>()?;

        let symbols: Vec<String> = assets.iter().map(|a| a.symbol.clone()).collect();
        let prices = self.quote_service.get_latest_prices(&symbols).await;

        let missing: Vec<&str> = symbols
            .iter()
            .filter(|s| !prices.contains_key(*s))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            warn!("Cannot create portfolio, no price for {}", missing.join(", "));
            return Err(Error::ServiceUnavailable(format!(
                "Price unavailable for {}",
                missing.join(", ")
            )));
        }

        let now = Utc::now().naive_utc();
        let invest = new_portfolio.initial_invest_amount;
        let portfolio = Portfolio {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: new_portfolio.name.trim().to_string(),
            description: new_portfolio
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            initial_invest_amount: invest,
            created_at: now,
        };

        let mut details = Vec::with_capacity(assets.len());
        for (request, asset) in new_portfolio.items.into_iter().zip(assets) {
            let entry_price = prices
                .get(&asset.symbol)
                .copied()
                .ok_or_else(|| Error::ServiceUnavailable(format!(
                    "Price unavailable for {}",
                    asset.symbol
                )))?;
            let initial_quantity = invest
                .checked_mul(request.target_weight)
                .and_then(|amount| amount.checked_div(ONE_HUNDRED))
                .and_then(|amount| amount.checked_div(entry_price))
                .filter(|quantity| *quantity <= MAX_QUANTITY)
                .ok_or_else(|| {
                    Error::invalid_input(format!(
                        "Initial quantity of {} at price {} exceeds the supported range",
                        asset.symbol, entry_price
                    ))
                })?;
            let item = PortfolioItem {
                id: Uuid::new_v4().to_string(),
                portfolio_id: portfolio.id.clone(),
                asset_id: asset.id.clone(),
                target_weight: request.target_weight,
                tolerance: request.tolerance,
                entry_price,
                initial_quantity,
                current_quantity: initial_quantity,
                version: 1,
                created_at: now,
                updated_at: now,
            };
            details.push(PortfolioItemDetail { item, asset });
        }

        let items = details.iter().map(|d| d.item.clone()).collect();
        let portfolio = self.repository.create(portfolio, items).await?;
        info!(
            "Created portfolio {} with {} items for user {}",
            portfolio.id,
            details.len(),
            user_id
        );

        Ok(PortfolioDetail {
            portfolio,
            items: details,
        })
    }

    fn list_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        self.repository.list_by_user(user_id)
    }

    fn get_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<PortfolioDetail> {
        let portfolio = self.get_owned(user_id, portfolio_id)?;
        self.load_detail(portfolio)
    }

    async fn update_item_quantity(
        &self,
        user_id: &str,
        portfolio_id: &str,
        item_id: &str,
        update: ItemQuantityUpdate,
    ) -> Result<PortfolioItem> {
        update.validate()?;
        self.get_owned(user_id, portfolio_id)?;
        let item = self
            .repository
            .update_item_quantity(portfolio_id, item_id, update)
            .await?;
        debug!(
            "Item {} quantity set to {} (version {})",
            item.id, item.current_quantity, item.version
        );
        Ok(item)
    }

    async fn delete_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<()> {
        self.get_owned(user_id, portfolio_id)?;
        self.repository.delete(portfolio_id).await?;
        info!("Deleted portfolio {}", portfolio_id);
        Ok(())
    }

    async fn analyze_portfolio(
        &self,
        user_id: &str,
        portfolio_id: &str,
    ) -> Result<PortfolioAnalysis> {
        let detail = self.get_portfolio(user_id, portfolio_id)?;
        let prices = self.price_snapshot(&detail.items).await;
        debug!(
            "Analyzing portfolio {} with {}/{} prices",
            portfolio_id,
            prices.len(),
            detail.items.len()
        );
        analyze(
            &detail.portfolio,
            &detail.items,
            &prices,
            self.missing_price_policy,
        )
        .map_err(|e| match e {
            AnalysisError::ValueOutOfRange(_) => {
                warn!("Analysis of portfolio {} overflowed: {}", portfolio_id, e);
                Error::invalid_input(e.to_string())
            }
            other => Error::Analysis(other),
        })
    }
}
