use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use driftfolio_core::users::{User, UserRepositoryTrait};
use driftfolio_core::{Error, Result};

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;
use crate::schema::users::dsl::*;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_email: String, new_password_hash: String) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let user_db = UserDB {
                    id: Uuid::new_v4().to_string(),
                    email: new_email,
                    password_hash: new_password_hash,
                    created_at: Utc::now().naive_utc(),
                };

                let result_db = diesel::insert_into(users::table)
                    .values(&user_db)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(result_db))
            })
            .await
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(User::from)
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    fn get_by_email(&self, user_email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users
            .filter(email.eq(user_email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user_db.map(User::from))
    }
}
