use log::{debug, info};
use std::sync::Arc;

use super::assets_model::{normalize_symbol, Asset, AssetPrice, AssetSearchQuery, NewAsset};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::quotes::{QuoteServiceTrait, SymbolSearchResult};

/// Service for asset lookup, registration and pricing.
pub struct AssetService {
    repository: Arc<dyn AssetRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl AssetService {
    pub fn new(
        repository: Arc<dyn AssetRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            repository,
            quote_service,
        }
    }
}

#[async_trait::async_trait]
impl AssetServiceTrait for AssetService {
    async fn search_assets(&self, query: AssetSearchQuery) -> Result<Vec<SymbolSearchResult>> {
        let (query, limit) = query.resolve()?;
        let mut results = self.quote_service.search(&query, limit).await?;

        let symbols: Vec<String> = results.iter().map(|r| r.symbol.clone()).collect();
        let prices = self.quote_service.get_latest_prices(&symbols).await;
        debug!(
            "Search '{}' returned {} results, {} priced",
            query,
            results.len(),
            prices.len()
        );

        for result in results.iter_mut() {
            result.current_price = prices.get(&result.symbol).copied();
        }
        Ok(results)
    }

    async fn create_asset(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;
        let new_asset = new_asset.normalized();

        if let Some(existing) = self.repository.get_by_symbol(&new_asset.symbol)? {
            debug!("Asset {} already registered as {}", existing.symbol, existing.id);
            return Ok(existing);
        }

        let symbol = new_asset.symbol.clone();
        match self.repository.create(new_asset).await {
            Ok(asset) => {
                info!("Registered asset {} ({})", asset.symbol, asset.id);
                Ok(asset)
            }
            // Lost a race against a concurrent create of the same symbol.
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => self
                .repository
                .get_by_symbol(&symbol)?
                .ok_or_else(|| Error::NotFound(format!("Asset {}", symbol))),
            Err(e) => Err(e),
        }
    }

    fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        self.repository.get_by_id(asset_id)
    }

    async fn get_asset_price(&self, asset_id: &str) -> Result<AssetPrice> {
        let asset = self.repository.get_by_id(asset_id)?;
        let symbol = normalize_symbol(&asset.symbol);
        match self.quote_service.get_latest_price(&symbol).await? {
            Some(price) => Ok(AssetPrice { symbol, price }),
            None => Err(Error::ServiceUnavailable(format!(
                "Price unavailable for {}",
                symbol
            ))),
        }
    }
}
