//! In-memory repositories and quote stubs shared by service tests.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::assets::{Asset, AssetRepositoryTrait, NewAsset};
use crate::errors::{DatabaseError, Error, Result};
use crate::portfolios::{ItemQuantityUpdate, Portfolio, PortfolioItem, PortfolioRepositoryTrait};
use crate::quotes::{QuoteServiceTrait, SymbolSearchResult};
use crate::users::{PasswordHasherTrait, User, UserRepositoryTrait};

pub fn timestamp() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn asset(id: &str, symbol: &str) -> Asset {
    Asset {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: format!("{} Corp", symbol),
        exchange: None,
        currency: "USD".to_string(),
        asset_type: "stock".to_string(),
        created_at: timestamp(),
    }
}

// =========================================================================
// Assets
// =========================================================================

#[derive(Default)]
pub struct InMemoryAssetRepository {
    assets: Mutex<Vec<Asset>>,
}

impl InMemoryAssetRepository {
    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self {
            assets: Mutex::new(assets),
        }
    }

    pub fn count(&self) -> usize {
        self.assets.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetRepositoryTrait for InMemoryAssetRepository {
    async fn create(&self, new_asset: NewAsset) -> Result<Asset> {
        let mut assets = self.assets.lock().unwrap();
        if assets.iter().any(|a| a.symbol == new_asset.symbol) {
            return Err(DatabaseError::UniqueViolation(new_asset.symbol).into());
        }
        let asset = Asset {
            id: Uuid::new_v4().to_string(),
            symbol: new_asset.symbol,
            name: new_asset.name,
            exchange: new_asset.exchange,
            currency: new_asset.currency.unwrap_or_default(),
            asset_type: new_asset.asset_type.unwrap_or_default(),
            created_at: timestamp(),
        };
        assets.push(asset.clone());
        Ok(asset)
    }

    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == asset_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Asset {}", asset_id)))
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Asset>> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.symbol == symbol)
            .cloned())
    }

    fn list_by_ids(&self, asset_ids: &[String]) -> Result<Vec<Asset>> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| asset_ids.contains(&a.id))
            .cloned()
            .collect())
    }
}

// =========================================================================
// Portfolios
// =========================================================================

#[derive(Default)]
pub struct InMemoryPortfolioRepository {
    portfolios: Mutex<Vec<Portfolio>>,
    items: Mutex<Vec<PortfolioItem>>,
}

impl InMemoryPortfolioRepository {
    pub fn item_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for InMemoryPortfolioRepository {
    async fn create(&self, portfolio: Portfolio, items: Vec<PortfolioItem>) -> Result<Portfolio> {
        self.portfolios.lock().unwrap().push(portfolio.clone());
        self.items.lock().unwrap().extend(items);
        Ok(portfolio)
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.portfolios
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Portfolio {}", portfolio_id)))
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        Ok(self
            .portfolios
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_items(&self, portfolio_id: &str) -> Result<Vec<PortfolioItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    async fn update_item_quantity(
        &self,
        portfolio_id: &str,
        item_id: &str,
        update: ItemQuantityUpdate,
    ) -> Result<PortfolioItem> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id && i.portfolio_id == portfolio_id)
            .ok_or_else(|| Error::NotFound(format!("Portfolio item {}", item_id)))?;
        if let Some(expected) = update.expected_version {
            if expected != item.version {
                return Err(Error::Conflict(format!(
                    "Item {} is at version {}, expected {}",
                    item_id, item.version, expected
                )));
            }
        }
        item.current_quantity = update.current_quantity;
        item.version += 1;
        item.updated_at = timestamp();
        Ok(item.clone())
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let mut portfolios = self.portfolios.lock().unwrap();
        let before = portfolios.len();
        portfolios.retain(|p| p.id != portfolio_id);
        self.items
            .lock()
            .unwrap()
            .retain(|i| i.portfolio_id != portfolio_id);
        Ok(before - portfolios.len())
    }
}

// =========================================================================
// Quotes
// =========================================================================

#[derive(Default)]
pub struct StaticQuotes {
    prices: Mutex<HashMap<String, Decimal>>,
    search_hits: Vec<SymbolSearchResult>,
}

impl StaticQuotes {
    pub fn with_prices(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: Mutex::new(
                prices
                    .iter()
                    .map(|(s, p)| (s.to_string(), *p))
                    .collect(),
            ),
            search_hits: Vec::new(),
        }
    }

    pub fn with_search_hits(mut self, hits: Vec<SymbolSearchResult>) -> Self {
        self.search_hits = hits;
        self
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    pub fn remove_price(&self, symbol: &str) {
        self.prices.lock().unwrap().remove(symbol);
    }
}

#[async_trait]
impl QuoteServiceTrait for StaticQuotes {
    async fn get_latest_price(&self, symbol: &str) -> Result<Option<Decimal>> {
        Ok(self.prices.lock().unwrap().get(symbol).copied())
    }

    async fn get_latest_prices(&self, symbols: &[String]) -> HashMap<String, Decimal> {
        let prices = self.prices.lock().unwrap();
        symbols
            .iter()
            .filter_map(|s| prices.get(s).map(|p| (s.clone(), *p)))
            .collect()
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SymbolSearchResult>> {
        Ok(self.search_hits.iter().take(limit).cloned().collect())
    }
}

// =========================================================================
// Users
// =========================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn create(&self, email: String, password_hash: String) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(DatabaseError::UniqueViolation(email).into());
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            created_at: timestamp(),
        };
        users.push(user.clone());
        Ok(user)
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// Reversible stand-in for argon2.
pub struct PlainHasher;

impl PasswordHasherTrait for PlainHasher {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        Ok(password_hash == format!("plain${}", password))
    }
}
