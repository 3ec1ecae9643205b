use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashSet;
use std::sync::Arc;

use super::{require_id, FilmStorage};
use crate::database::FilmorateDatabase;
use crate::error::{AppError, AppResult};
use crate::models::{Adjacency, Film, FilmId, FilmRequest, Mpa, MpaId, UserId, ValidFilm};
use crate::validation::EntityValidator;

const FILM_COLUMNS: &str = "SELECT f.id, f.name, f.description, f.release_date, f.duration, \
     f.mpa_id, m.name AS mpa_name FROM films f JOIN mpa m ON m.id = f.mpa_id";

/// Films table plus the likes edge table.
pub struct FilmDbStorage {
    db: Arc<FilmorateDatabase>,
    validator: Arc<dyn EntityValidator>,
}

impl FilmDbStorage {
    pub fn new(db: Arc<FilmorateDatabase>, validator: Arc<dyn EntityValidator>) -> Self {
        Self { db, validator }
    }

    async fn resolve_mpa(&self, id: MpaId) -> AppResult<Mpa> {
        let row = sqlx::query("SELECT id, name FROM mpa WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        match row {
            Some(row) => Ok(Mpa::new(row.try_get("id")?, row.try_get::<String, _>("name")?)),
            None => Err(AppError::Validation(format!("Unknown MPA rating id {}", id))),
        }
    }

    async fn film_exists(&self, id: FilmId) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM films WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn load_likes(&self, id: FilmId) -> AppResult<HashSet<UserId>> {
        let rows = sqlx::query("SELECT user_id FROM likes WHERE film_id = ?")
            .bind(id)
            .fetch_all(&self.db.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<i64, _>("user_id").map_err(AppError::from))
            .collect()
    }
}

fn map_film_row(row: &SqliteRow) -> AppResult<(FilmId, ValidFilm, Mpa)> {
    let mpa_id: MpaId = row.try_get("mpa_id")?;
    Ok((
        row.try_get("id")?,
        ValidFilm {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            release_date: row.try_get("release_date")?,
            duration: row.try_get("duration")?,
            mpa_id,
        },
        Mpa::new(mpa_id, row.try_get::<String, _>("mpa_name")?),
    ))
}

#[async_trait]
impl FilmStorage for FilmDbStorage {
    async fn all_films(&self) -> AppResult<Vec<Film>> {
        let rows = sqlx::query(&format!("{} ORDER BY f.id", FILM_COLUMNS))
            .fetch_all(&self.db.pool)
            .await?;

        let edges = sqlx::query("SELECT film_id, user_id FROM likes")
            .fetch_all(&self.db.pool)
            .await?
            .iter()
            .map(|row| -> AppResult<(FilmId, UserId)> {
                Ok((row.try_get("film_id")?, row.try_get("user_id")?))
            })
            .collect::<AppResult<Vec<_>>>()?;
        let mut adjacency: Adjacency<FilmId, UserId> = Adjacency::from_edges(edges);

        rows.iter()
            .map(|row| -> AppResult<Film> {
                let (id, record, mpa) = map_film_row(row)?;
                Ok(Film::from_record(id, record, mpa, adjacency.take(&id)))
            })
            .collect()
    }

    async fn add_film(&self, request: FilmRequest) -> AppResult<Film> {
        let record = self.validator.validate_film(&request)?;
        let mpa = self.resolve_mpa(record.mpa_id).await?;

        let result = sqlx::query(
            "INSERT INTO films (name, description, release_date, duration, mpa_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.release_date)
        .bind(record.duration)
        .bind(record.mpa_id)
        .execute(&self.db.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!("film {} ({}) has been added", id, record.name);

        Ok(Film::from_record(id, record, mpa, HashSet::new()))
    }

    async fn update_film(&self, request: FilmRequest) -> AppResult<Film> {
        let id = require_id(request.id, "film")?;
        if !self.film_exists(id).await? {
            return Err(AppError::NotFound(format!("Film with id {} not found", id)));
        }
        let record = self.validator.validate_film(&request)?;
        let mpa = self.resolve_mpa(record.mpa_id).await?;

        let result = sqlx::query(
            "UPDATE films SET name = ?, description = ?, release_date = ?, duration = ?, mpa_id = ? WHERE id = ?",
        )
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.release_date)
        .bind(record.duration)
        .bind(record.mpa_id)
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Film with id {} not found", id)));
        }
        tracing::debug!("film {} has been updated", id);

        let likes = self.load_likes(id).await?;
        Ok(Film::from_record(id, record, mpa, likes))
    }

    async fn find_film(&self, id: FilmId) -> AppResult<Option<Film>> {
        let row = sqlx::query(&format!("{} WHERE f.id = ?", FILM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        match row {
            Some(row) => {
                let (id, record, mpa) = map_film_row(&row)?;
                let likes = self.load_likes(id).await?;
                Ok(Some(Film::from_record(id, record, mpa, likes)))
            }
            None => Ok(None),
        }
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("INSERT OR IGNORE INTO likes (film_id, user_id) VALUES (?, ?)")
            .bind(film_id)
            .bind(user_id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("user {} already likes film {}", user_id, film_id);
        }
        Ok(())
    }

    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM likes WHERE film_id = ? AND user_id = ?")
            .bind(film_id)
            .bind(user_id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "User {} has not liked film {}",
                user_id, film_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MpaRef, UserRequest};
    use crate::storage::{UserDbStorage, UserStorage};
    use crate::validation::StandardValidator;
    use chrono::NaiveDate;

    async fn storages() -> (FilmDbStorage, UserDbStorage) {
        let db = Arc::new(FilmorateDatabase::new_in_memory().await.unwrap());
        let validator: Arc<dyn EntityValidator> = Arc::new(StandardValidator::new());
        (
            FilmDbStorage::new(db.clone(), validator.clone()),
            UserDbStorage::new(db, validator),
        )
    }

    fn film(name: &str) -> FilmRequest {
        FilmRequest {
            id: None,
            name: Some(name.to_string()),
            description: Some(format!("about {}", name)),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31),
            duration: Some(136),
            mpa: Some(MpaRef { id: 4 }),
        }
    }

    fn user(login: &str) -> UserRequest {
        UserRequest {
            email: Some(format!("{}@mail.ru", login)),
            login: Some(login.to_string()),
            birthday: NaiveDate::from_ymd_opt(1980, 1, 1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_film_resolves_mpa() {
        let (films, _) = storages().await;
        let added = films.add_film(film("matrix")).await.unwrap();

        assert_eq!(added.mpa, Mpa::new(4, "R"));
        assert_eq!(films.get_film(added.id).await.unwrap(), added);
    }

    #[tokio::test]
    async fn test_unknown_mpa_is_rejected() {
        let (films, _) = storages().await;
        let mut request = film("matrix");
        request.mpa = Some(MpaRef { id: 99 });

        assert!(films.add_film(request).await.unwrap_err().is_validation());
        assert!(films.all_films().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_film_is_not_found() {
        let (films, _) = storages().await;
        let mut request = film("ghost");
        request.id = Some(7);
        request.duration = Some(-1);

        assert!(films.update_film(request).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_like_count_is_derived_from_edges() {
        let (films, users) = storages().await;
        let matrix = films.add_film(film("matrix")).await.unwrap();
        let neo = users.add_user(user("neo")).await.unwrap();
        let trinity = users.add_user(user("trinity")).await.unwrap();

        films.add_like(matrix.id, neo.id).await.unwrap();
        films.add_like(matrix.id, neo.id).await.unwrap();
        films.add_like(matrix.id, trinity.id).await.unwrap();
        assert_eq!(films.get_film(matrix.id).await.unwrap().likes_count(), 2);

        films.remove_like(matrix.id, neo.id).await.unwrap();
        let after = films.get_film(matrix.id).await.unwrap();
        assert_eq!(after.likes_count(), 1);
        assert!(after.is_liked_by(trinity.id));

        let err = films.remove_like(matrix.id, neo.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_like_for_missing_user_is_not_found() {
        let (films, _) = storages().await;
        let matrix = films.add_film(film("matrix")).await.unwrap();

        assert!(films.add_like(matrix.id, 5).await.unwrap_err().is_not_found());
        assert!(films.add_like(404, 5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_all_films_attaches_likes_per_film() {
        let (films, users) = storages().await;
        let first = films.add_film(film("first")).await.unwrap();
        let second = films.add_film(film("second")).await.unwrap();
        let fan = users.add_user(user("fan")).await.unwrap();
        films.add_like(second.id, fan.id).await.unwrap();

        let all = films.all_films().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].likes_count(), 0);
        assert_eq!(all[1].likes_count(), 1);
    }
}
