use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use super::MpaStorage;
use crate::database::FilmorateDatabase;
use crate::error::AppResult;
use crate::models::{Mpa, MpaId};

/// Read-only access to the seeded rating table.
pub struct MpaDbStorage {
    db: Arc<FilmorateDatabase>,
}

impl MpaDbStorage {
    pub fn new(db: Arc<FilmorateDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MpaStorage for MpaDbStorage {
    async fn all_mpa(&self) -> AppResult<Vec<Mpa>> {
        let rows = sqlx::query("SELECT id, name FROM mpa ORDER BY id")
            .fetch_all(&self.db.pool)
            .await?;

        rows.iter()
            .map(|row| -> AppResult<Mpa> {
                Ok(Mpa::new(row.try_get("id")?, row.try_get::<String, _>("name")?))
            })
            .collect()
    }

    async fn find_mpa(&self, id: MpaId) -> AppResult<Option<Mpa>> {
        let row = sqlx::query("SELECT id, name FROM mpa WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Mpa::new(
                row.try_get("id")?,
                row.try_get::<String, _>("name")?,
            ))),
            None => Ok(None),
        }
    }
}
