use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::Mpa;

// SQLite-backed relational store with SQLx connection pool
pub struct FilmorateDatabase {
    pub pool: SqlitePool,
}

impl FilmorateDatabase {
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::ConfigurationError(format!("Invalid database url {}: {}", database_url, e))
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database opens a fresh, empty one,
        // so the pool is pinned to a single long-lived connection.
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to {}: {}", database_url, e))
        })?;

        Ok(FilmorateDatabase { pool })
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        let db = Self::new("sqlite::memory:", 1).await?;
        db.init().await?;
        Ok(db)
    }

    pub async fn init(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS mpa (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create mpa table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                login TEXT NOT NULL,
                name TEXT NOT NULL,
                birthday TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create users table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS films (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                release_date TEXT NOT NULL,
                duration INTEGER NOT NULL CHECK (duration > 0),
                mpa_id INTEGER NOT NULL REFERENCES mpa(id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create films table: {}", e)))?;

        // Directed friendship edges
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS friendships (
                from_id INTEGER NOT NULL REFERENCES users(id),
                to_id INTEGER NOT NULL REFERENCES users(id),
                PRIMARY KEY (from_id, to_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to create friendships table: {}", e))
        })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS likes (
                film_id INTEGER NOT NULL REFERENCES films(id),
                user_id INTEGER NOT NULL REFERENCES users(id),
                PRIMARY KEY (film_id, user_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create likes table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_friendships_to ON friendships(to_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_likes_user ON likes(user_id)")
            .execute(&self.pool)
            .await?;

        for (id, name) in Mpa::CATALOGUE {
            sqlx::query("INSERT OR IGNORE INTO mpa (id, name) VALUES (?, ?)")
                .bind(id)
                .bind(name)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to seed mpa rating {}: {}", name, e))
                })?;
        }

        tracing::debug!("database schema initialized");
        Ok(())
    }

    /// Health check to verify database connectivity
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {}", e)))?;
        Ok(())
    }
}
