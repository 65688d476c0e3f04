//! Database models for assets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use driftfolio_core::assets::Asset;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub currency: String,
    pub asset_type: String,
    pub created_at: NaiveDateTime,
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Self {
            id: db.id,
            symbol: db.symbol,
            name: db.name,
            exchange: db.exchange,
            currency: db.currency,
            asset_type: db.asset_type,
            created_at: db.created_at,
        }
    }
}
