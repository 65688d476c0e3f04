//! Asset repository and service traits.

use async_trait::async_trait;

use super::assets_model::{Asset, AssetPrice, AssetSearchQuery, NewAsset};
use crate::errors::Result;
use crate::quotes::SymbolSearchResult;

/// Persistence contract for assets.
#[async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    /// Inserts a normalized asset. Fails with a unique violation when the
    /// symbol already exists.
    async fn create(&self, new_asset: NewAsset) -> Result<Asset>;

    /// Returns `Error::NotFound` when the asset does not exist.
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;

    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Asset>>;

    fn list_by_ids(&self, asset_ids: &[String]) -> Result<Vec<Asset>>;
}

#[async_trait]
pub trait AssetServiceTrait: Send + Sync {
    /// Searches the market data provider and attaches live prices where available.
    async fn search_assets(&self, query: AssetSearchQuery) -> Result<Vec<SymbolSearchResult>>;

    /// Registers an asset, returning the existing one when the symbol is known.
    async fn create_asset(&self, new_asset: NewAsset) -> Result<Asset>;

    fn get_asset(&self, asset_id: &str) -> Result<Asset>;

    /// Returns `Error::ServiceUnavailable` when no live price exists.
    async fn get_asset_price(&self, asset_id: &str) -> Result<AssetPrice>;
}
