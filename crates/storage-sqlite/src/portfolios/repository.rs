use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use driftfolio_core::portfolios::{
    ItemQuantityUpdate, Portfolio, PortfolioItem, PortfolioRepositoryTrait,
};
use driftfolio_core::{Error, Result};

use super::model::{PortfolioDB, PortfolioItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{portfolio_items, portfolios};

pub struct PortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PortfolioRepository { pool, writer }
    }

    fn to_items(rows: Vec<PortfolioItemDB>) -> Result<Vec<PortfolioItem>> {
        rows.into_iter()
            .map(|row| PortfolioItem::try_from(row).map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, portfolio: Portfolio, items: Vec<PortfolioItem>) -> Result<Portfolio> {
        let portfolio_db = PortfolioDB::from(portfolio);
        let items_db: Vec<PortfolioItemDB> = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| PortfolioItemDB::from_domain(item, idx as i32))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let result_db = diesel::insert_into(portfolios::table)
                    .values(&portfolio_db)
                    .returning(PortfolioDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                diesel::insert_into(portfolio_items::table)
                    .values(&items_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                debug!(
                    "Created portfolio {} with {} items",
                    result_db.id,
                    items_db.len()
                );
                Ok(Portfolio::try_from(result_db)?)
            })
            .await
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        let portfolio_db = portfolios::table
            .find(portfolio_id)
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::NotFound(format!("Portfolio {}", portfolio_id)))?;
        Ok(Portfolio::try_from(portfolio_db)?)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        portfolios::table
            .filter(portfolios::user_id.eq(user_id))
            .order((portfolios::created_at.asc(), portfolios::id.asc()))
            .select(PortfolioDB::as_select())
            .load::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(|row| Portfolio::try_from(row).map_err(Error::from))
            .collect()
    }

    fn list_items(&self, portfolio_id: &str) -> Result<Vec<PortfolioItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolio_items::table
            .filter(portfolio_items::portfolio_id.eq(portfolio_id))
            .order(portfolio_items::position.asc())
            .select(PortfolioItemDB::as_select())
            .load::<PortfolioItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::to_items(rows)
    }

    async fn update_item_quantity(
        &self,
        portfolio_id: &str,
        item_id: &str,
        update: ItemQuantityUpdate,
    ) -> Result<PortfolioItem> {
        let portfolio_id = portfolio_id.to_string();
        let item_id = item_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PortfolioItem> {
                let stored = portfolio_items::table
                    .filter(portfolio_items::id.eq(item_id.as_str()))
                    .filter(portfolio_items::portfolio_id.eq(portfolio_id.as_str()))
                    .select(PortfolioItemDB::as_select())
                    .first::<PortfolioItemDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound(format!("Portfolio item {}", item_id)))?;

                if let Some(expected) = update.expected_version {
                    if expected != stored.version {
                        return Err(Error::Conflict(format!(
                            "Portfolio item {} is at version {}, expected {}",
                            item_id, stored.version, expected
                        )));
                    }
                }

                let updated = diesel::update(portfolio_items::table.find(item_id.as_str()))
                    .set((
                        portfolio_items::current_quantity
                            .eq(update.current_quantity.to_string()),
                        portfolio_items::version.eq(stored.version + 1),
                        portfolio_items::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(PortfolioItemDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(PortfolioItem::try_from(updated)?)
            })
            .await
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Items go with the portfolio through ON DELETE CASCADE.
                Ok(diesel::delete(portfolios::table.find(portfolio_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_asset, insert_user, setup, TestDb};
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn portfolio(id: &str, user_id: &str) -> Portfolio {
        Portfolio {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: format!("Portfolio {}", id),
            description: None,
            initial_invest_amount: dec!(10000),
            created_at: now(),
        }
    }

    fn item(id: &str, portfolio_id: &str, asset_id: &str, weight: Decimal) -> PortfolioItem {
        PortfolioItem {
            id: id.to_string(),
            portfolio_id: portfolio_id.to_string(),
            asset_id: asset_id.to_string(),
            target_weight: weight,
            tolerance: dec!(5),
            entry_price: dec!(100.25),
            initial_quantity: dec!(49.8753117206982543640897756),
            current_quantity: dec!(49.8753117206982543640897756),
            version: 1,
            created_at: now(),
            updated_at: now(),
        }
    }

    async fn seeded() -> (PortfolioRepository, TestDb) {
        let db = setup();
        insert_user(&db.pool, "u1");
        insert_asset(&db.pool, "a-msft", "MSFT");
        insert_asset(&db.pool, "a-aapl", "AAPL");
        insert_asset(&db.pool, "a-goog", "GOOG");

        let repo = PortfolioRepository::new(db.pool.clone(), db.writer.clone());
        repo.create(
            portfolio("p1", "u1"),
            vec![
                item("i-msft", "p1", "a-msft", dec!(50)),
                item("i-aapl", "p1", "a-aapl", dec!(30)),
                item("i-goog", "p1", "a-goog", dec!(20)),
            ],
        )
        .await
        .unwrap();
        (repo, db)
    }

    #[tokio::test]
    async fn test_create_round_trips_decimals_and_keeps_item_order() {
        let (repo, _db) = seeded().await;

        let stored = repo.get_by_id("p1").unwrap();
        assert_eq!(stored.initial_invest_amount, dec!(10000));

        let items = repo.list_items("p1").unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-msft", "i-aapl", "i-goog"]);
        assert_eq!(items[0].entry_price, dec!(100.25));
        assert_eq!(
            items[0].initial_quantity,
            dec!(49.8753117206982543640897756)
        );
    }

    #[tokio::test]
    async fn test_list_by_user_only_returns_owned_portfolios() {
        let (repo, db) = seeded().await;
        insert_user(&db.pool, "u2");
        repo.create(
            portfolio("p2", "u2"),
            vec![item("i-x", "p2", "a-msft", dec!(100))],
        )
        .await
        .unwrap();

        let owned: Vec<String> = repo
            .list_by_user("u1")
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(owned, vec!["p1".to_string()]);
        assert!(repo.list_by_user("nobody").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_item_insert_rolls_back_portfolio() {
        let (repo, _db) = seeded().await;

        let err = repo
            .create(
                portfolio("p3", "u1"),
                vec![item("i-bad", "p3", "no-such-asset", dec!(100))],
            )
            .await;

        assert!(err.is_err());
        assert!(matches!(repo.get_by_id("p3"), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_item_quantity_bumps_version() {
        let (repo, _db) = seeded().await;

        let updated = repo
            .update_item_quantity("p1", "i-aapl", ItemQuantityUpdate::new(dec!(12.5)))
            .await
            .unwrap();
        assert_eq!(updated.current_quantity, dec!(12.5));
        assert_eq!(updated.version, 2);
        assert_eq!(updated.entry_price, dec!(100.25));

        let again = repo
            .update_item_quantity(
                "p1",
                "i-aapl",
                ItemQuantityUpdate::new(dec!(0)).expecting_version(2),
            )
            .await
            .unwrap();
        assert_eq!(again.current_quantity, dec!(0));
        assert_eq!(again.version, 3);
    }

    #[tokio::test]
    async fn test_stale_version_is_conflict() {
        let (repo, _db) = seeded().await;

        repo.update_item_quantity("p1", "i-msft", ItemQuantityUpdate::new(dec!(10)))
            .await
            .unwrap();
        let err = repo
            .update_item_quantity(
                "p1",
                "i-msft",
                ItemQuantityUpdate::new(dec!(11)).expecting_version(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let items = repo.list_items("p1").unwrap();
        assert_eq!(items[0].current_quantity, dec!(10));
    }

    #[tokio::test]
    async fn test_update_requires_item_in_portfolio() {
        let (repo, _db) = seeded().await;

        let err = repo
            .update_item_quantity("other", "i-msft", ItemQuantityUpdate::new(dec!(1)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Portfolio item i-msft not found");
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let (repo, _db) = seeded().await;
        let repo = Arc::new(repo);

        let handles: Vec<_> = (1..=10)
            .map(|n| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.update_item_quantity(
                        "p1",
                        "i-goog",
                        ItemQuantityUpdate::new(Decimal::from(n)),
                    )
                    .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let goog = repo
            .list_items("p1")
            .unwrap()
            .into_iter()
            .find(|i| i.id == "i-goog")
            .unwrap();
        assert_eq!(goog.version, 11);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let (repo, _db) = seeded().await;

        assert_eq!(repo.delete("p1").await.unwrap(), 1);
        assert!(matches!(repo.get_by_id("p1"), Err(Error::NotFound(_))));
        assert!(repo.list_items("p1").unwrap().is_empty());
        assert_eq!(repo.delete("p1").await.unwrap(), 0);
    }
}
