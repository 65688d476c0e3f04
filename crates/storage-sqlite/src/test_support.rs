//! Temp-file database fixtures shared by repository tests.

use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::{assets, users};

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("driftfolio.db");
    let db_path = init(&db_path.to_string_lossy()).expect("Failed to init database");

    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub fn insert_user(pool: &DbPool, user_id: &str) {
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(users::table)
        .values((
            users::id.eq(user_id),
            users::email.eq(format!("{}@example.com", user_id)),
            users::password_hash.eq("hash"),
            users::created_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .expect("insert user");
}

pub fn insert_asset(pool: &DbPool, asset_id: &str, symbol: &str) {
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(assets::table)
        .values((
            assets::id.eq(asset_id),
            assets::symbol.eq(symbol),
            assets::name.eq(format!("{} Inc.", symbol)),
            assets::currency.eq("USD"),
            assets::asset_type.eq("stock"),
            assets::created_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .expect("insert asset");
}
