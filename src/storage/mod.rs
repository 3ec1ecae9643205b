// Storage layer - persistence of users, films and their edges
// Every backend delegates field validation to the shared EntityValidator

pub mod film_db;
pub mod memory;
pub mod mpa_db;
pub mod user_db;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{Film, FilmId, FilmRequest, Mpa, MpaId, User, UserId, UserRequest};

pub use film_db::FilmDbStorage;
pub use memory::InMemoryStorage;
pub use mpa_db::MpaDbStorage;
pub use user_db::UserDbStorage;

#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn all_users(&self) -> AppResult<Vec<User>>;
    async fn add_user(&self, request: UserRequest) -> AppResult<User>;
    /// Full replace keyed by `request.id`; existence is checked before validation.
    async fn update_user(&self, request: UserRequest) -> AppResult<User>;
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Inserts the directed edge; returns false if it already existed.
    async fn add_friend(&self, from: UserId, to: UserId) -> AppResult<bool>;
    /// Deletes the directed edge; returns false if there was nothing to delete.
    async fn remove_friend(&self, from: UserId, to: UserId) -> AppResult<bool>;
}

#[async_trait]
pub trait FilmStorage: Send + Sync {
    async fn all_films(&self) -> AppResult<Vec<Film>>;
    async fn add_film(&self, request: FilmRequest) -> AppResult<Film>;
    async fn update_film(&self, request: FilmRequest) -> AppResult<Film>;
    async fn find_film(&self, id: FilmId) -> AppResult<Option<Film>>;

    async fn get_film(&self, id: FilmId) -> AppResult<Film> {
        self.find_film(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Film with id {} not found", id)))
    }

    /// Idempotent: liking twice leaves a single edge.
    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()>;
    /// Fails with NotFound when the like did not exist.
    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()>;
}

#[async_trait]
pub trait MpaStorage: Send + Sync {
    async fn all_mpa(&self) -> AppResult<Vec<Mpa>>;
    async fn find_mpa(&self, id: MpaId) -> AppResult<Option<Mpa>>;

    async fn get_mpa(&self, id: MpaId) -> AppResult<Mpa> {
        self.find_mpa(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("MPA rating with id {} not found", id)))
    }
}

/// Update payloads must name the record they replace.
pub(crate) fn require_id(id: Option<i64>, entity: &str) -> AppResult<i64> {
    id.ok_or_else(|| AppError::Validation(format!("The {} id is required for update", entity)))
}
