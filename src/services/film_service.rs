// FilmService - likes and popularity ranking over FilmStorage

use std::cmp::Reverse;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Film, FilmId, UserId},
    storage::{FilmStorage, UserStorage},
};

pub const DEFAULT_POPULAR_COUNT: i64 = 10;

#[derive(Clone)]
pub struct FilmService {
    films: Arc<dyn FilmStorage>,
    users: Arc<dyn UserStorage>,
}

impl FilmService {
    pub fn new(films: Arc<dyn FilmStorage>, users: Arc<dyn UserStorage>) -> Self {
        Self { films, users }
    }

    /// Top `count` films by like count, ties broken by ascending id.
    pub async fn most_popular(&self, count: Option<i64>) -> AppResult<Vec<Film>> {
        let count = count.unwrap_or(DEFAULT_POPULAR_COUNT);
        if count <= 0 {
            return Ok(Vec::new());
        }

        let films = self.films.all_films().await?;
        Ok(rank_by_likes(films, count as usize))
    }

    pub async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<Film> {
        self.films.get_film(film_id).await?;
        self.users.get_user(user_id).await?;

        self.films.add_like(film_id, user_id).await?;
        tracing::info!("user {} liked film {}", user_id, film_id);
        self.films.get_film(film_id).await
    }

    pub async fn delete_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<Film> {
        self.films.get_film(film_id).await?;
        self.users.get_user(user_id).await?;

        self.films.remove_like(film_id, user_id).await?;
        tracing::info!("user {} unliked film {}", user_id, film_id);
        self.films.get_film(film_id).await
    }
}

pub fn rank_by_likes(mut films: Vec<Film>, count: usize) -> Vec<Film> {
    films.sort_by_key(|film| (Reverse(film.likes_count()), film.id));
    films.truncate(count);
    films
}
