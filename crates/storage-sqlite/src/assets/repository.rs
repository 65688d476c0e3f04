use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use driftfolio_core::assets::{Asset, AssetRepositoryTrait, NewAsset};
use driftfolio_core::constants::{DEFAULT_ASSET_TYPE, DEFAULT_CURRENCY};
use driftfolio_core::{Error, Result};

use super::model::AssetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::assets;

pub struct AssetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AssetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AssetRepository { pool, writer }
    }
}

#[async_trait]
impl AssetRepositoryTrait for AssetRepository {
    async fn create(&self, new_asset: NewAsset) -> Result<Asset> {
        let new_asset = new_asset.normalized();
        let asset_db = AssetDB {
            id: Uuid::new_v4().to_string(),
            symbol: new_asset.symbol,
            name: new_asset.name,
            exchange: new_asset.exchange,
            currency: new_asset
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            asset_type: new_asset
                .asset_type
                .unwrap_or_else(|| DEFAULT_ASSET_TYPE.to_string()),
            created_at: Utc::now().naive_utc(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Asset> {
                let result_db = diesel::insert_into(assets::table)
                    .values(&asset_db)
                    .returning(AssetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Asset::from(result_db))
            })
            .await
    }

    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;
        assets::table
            .find(asset_id)
            .select(AssetDB::as_select())
            .first::<AssetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Asset::from)
            .ok_or_else(|| Error::NotFound(format!("Asset {}", asset_id)))
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Asset>> {
        let mut conn = get_connection(&self.pool)?;
        let asset_db = assets::table
            .filter(assets::symbol.eq(symbol.trim().to_uppercase()))
            .select(AssetDB::as_select())
            .first::<AssetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(asset_db.map(Asset::from))
    }

    fn list_by_ids(&self, asset_ids: &[String]) -> Result<Vec<Asset>> {
        if asset_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let assets_db = assets::table
            .filter(assets::id.eq_any(asset_ids))
            .select(AssetDB::as_select())
            .load::<AssetDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(assets_db.into_iter().map(Asset::from).collect())
    }
}
