use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashSet;
use std::sync::Arc;

use super::{require_id, UserStorage};
use crate::database::FilmorateDatabase;
use crate::error::{AppError, AppResult};
use crate::models::{Adjacency, User, UserId, UserRequest, ValidUser};
use crate::validation::EntityValidator;

/// Users table plus the friendships edge table.
pub struct UserDbStorage {
    db: Arc<FilmorateDatabase>,
    validator: Arc<dyn EntityValidator>,
}

impl UserDbStorage {
    pub fn new(db: Arc<FilmorateDatabase>, validator: Arc<dyn EntityValidator>) -> Self {
        Self { db, validator }
    }

    async fn user_exists(&self, id: UserId) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn load_friends(&self, id: UserId) -> AppResult<HashSet<UserId>> {
        let rows = sqlx::query("SELECT to_id FROM friendships WHERE from_id = ?")
            .bind(id)
            .fetch_all(&self.db.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<i64, _>("to_id").map_err(AppError::from))
            .collect()
    }
}

fn map_user_row(row: &SqliteRow) -> AppResult<(UserId, ValidUser)> {
    Ok((
        row.try_get("id")?,
        ValidUser {
            email: row.try_get("email")?,
            login: row.try_get("login")?,
            name: row.try_get("name")?,
            birthday: row.try_get("birthday")?,
        },
    ))
}

#[async_trait]
impl UserStorage for UserDbStorage {
    async fn all_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query("SELECT id, email, login, name, birthday FROM users ORDER BY id")
            .fetch_all(&self.db.pool)
            .await?;

        let edges = sqlx::query("SELECT from_id, to_id FROM friendships")
            .fetch_all(&self.db.pool)
            .await?
            .iter()
            .map(|row| -> AppResult<(UserId, UserId)> {
                Ok((row.try_get("from_id")?, row.try_get("to_id")?))
            })
            .collect::<AppResult<Vec<_>>>()?;
        let mut adjacency: Adjacency<UserId, UserId> = Adjacency::from_edges(edges);

        rows.iter()
            .map(|row| -> AppResult<User> {
                let (id, record) = map_user_row(row)?;
                Ok(User::from_record(id, record, adjacency.take(&id)))
            })
            .collect()
    }

    async fn add_user(&self, request: UserRequest) -> AppResult<User> {
        let record = self.validator.validate_user(&request)?;

        let result = sqlx::query(
            "INSERT INTO users (email, login, name, birthday) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.email)
        .bind(&record.login)
        .bind(&record.name)
        .bind(record.birthday)
        .execute(&self.db.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!("user {} ({}) has been added", id, record.login);

        Ok(User::from_record(id, record, HashSet::new()))
    }

    async fn update_user(&self, request: UserRequest) -> AppResult<User> {
        let id = require_id(request.id, "user")?;
        if !self.user_exists(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        let record = self.validator.validate_user(&request)?;

        let result = sqlx::query(
            "UPDATE users SET email = ?, login = ?, name = ?, birthday = ? WHERE id = ?",
        )
        .bind(&record.email)
        .bind(&record.login)
        .bind(&record.name)
        .bind(record.birthday)
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        tracing::info!("user {} has been updated", id);

        let friends = self.load_friends(id).await?;
        Ok(User::from_record(id, record, friends))
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, login, name, birthday FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        match row {
            Some(row) => {
                let (id, record) = map_user_row(&row)?;
                let friends = self.load_friends(id).await?;
                Ok(Some(User::from_record(id, record, friends)))
            }
            None => Ok(None),
        }
    }

    async fn add_friend(&self, from: UserId, to: UserId) -> AppResult<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO friendships (from_id, to_id) VALUES (?, ?)")
            .bind(from)
            .bind(to)
            .execute(&self.db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_friend(&self, from: UserId, to: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM friendships WHERE from_id = ? AND to_id = ?")
            .bind(from)
            .bind(to)
            .execute(&self.db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
