// In-memory storage backend - same traits and validator as the SQLite storages,
// edges kept as explicit relation sets guarded by a single lock

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{require_id, FilmStorage, MpaStorage, UserStorage};
use crate::error::{AppError, AppResult};
use crate::models::{
    Film, FilmId, FilmRequest, Friendship, Like, Mpa, MpaId, User, UserId, UserRequest, ValidFilm,
    ValidUser,
};
use crate::validation::EntityValidator;

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, ValidUser>,
    films: BTreeMap<FilmId, ValidFilm>,
    friendships: HashSet<Friendship>,
    likes: HashSet<Like>,
    last_user_id: UserId,
    last_film_id: FilmId,
}

impl MemoryState {
    fn friends_of(&self, id: UserId) -> HashSet<UserId> {
        self.friendships
            .iter()
            .filter(|edge| edge.from == id)
            .map(|edge| edge.to)
            .collect()
    }

    fn likes_of(&self, id: FilmId) -> HashSet<UserId> {
        self.likes
            .iter()
            .filter(|edge| edge.film_id == id)
            .map(|edge| edge.user_id)
            .collect()
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.users
            .get(&id)
            .map(|record| User::from_record(id, record.clone(), self.friends_of(id)))
    }

    fn film(&self, id: FilmId) -> AppResult<Option<Film>> {
        match self.films.get(&id) {
            Some(record) => {
                let mpa = Mpa::lookup(record.mpa_id).ok_or_else(|| {
                    AppError::Internal(format!("film {} references unknown rating", id))
                })?;
                Ok(Some(Film::from_record(id, record.clone(), mpa, self.likes_of(id))))
            }
            None => Ok(None),
        }
    }

    fn ensure_user(&self, id: UserId) -> AppResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("User with id {} not found", id)))
        }
    }

    fn ensure_film(&self, id: FilmId) -> AppResult<()> {
        if self.films.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Film with id {} not found", id)))
        }
    }
}

fn resolve_mpa(id: MpaId) -> AppResult<Mpa> {
    Mpa::lookup(id).ok_or_else(|| AppError::Validation(format!("Unknown MPA rating id {}", id)))
}

pub struct InMemoryStorage {
    state: RwLock<MemoryState>,
    validator: Arc<dyn EntityValidator>,
}

impl InMemoryStorage {
    pub fn new(validator: Arc<dyn EntityValidator>) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            validator,
        }
    }
}

#[async_trait]
impl UserStorage for InMemoryStorage {
    async fn all_users(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .keys()
            .filter_map(|id| state.user(*id))
            .collect())
    }

    async fn add_user(&self, request: UserRequest) -> AppResult<User> {
        let record = self.validator.validate_user(&request)?;

        let mut state = self.state.write().await;
        state.last_user_id += 1;
        let id = state.last_user_id;
        state.users.insert(id, record.clone());
        tracing::info!("user {} ({}) has been added", id, record.login);

        Ok(User::from_record(id, record, HashSet::new()))
    }

    async fn update_user(&self, request: UserRequest) -> AppResult<User> {
        let id = require_id(request.id, "user")?;

        let mut state = self.state.write().await;
        state.ensure_user(id)?;
        let record = self.validator.validate_user(&request)?;
        state.users.insert(id, record.clone());
        tracing::info!("user {} has been updated", id);

        Ok(User::from_record(id, record, state.friends_of(id)))
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.user(id))
    }

    async fn add_friend(&self, from: UserId, to: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        state.ensure_user(from)?;
        state.ensure_user(to)?;
        Ok(state.friendships.insert(Friendship { from, to }))
    }

    async fn remove_friend(&self, from: UserId, to: UserId) -> AppResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .friendships
            .remove(&Friendship { from, to }))
    }
}

#[async_trait]
impl FilmStorage for InMemoryStorage {
    async fn all_films(&self) -> AppResult<Vec<Film>> {
        let state = self.state.read().await;
        let mut films = Vec::with_capacity(state.films.len());
        for id in state.films.keys() {
            if let Some(film) = state.film(*id)? {
                films.push(film);
            }
        }
        Ok(films)
    }

    async fn add_film(&self, request: FilmRequest) -> AppResult<Film> {
        let record = self.validator.validate_film(&request)?;
        let mpa = resolve_mpa(record.mpa_id)?;

        let mut state = self.state.write().await;
        state.last_film_id += 1;
        let id = state.last_film_id;
        state.films.insert(id, record.clone());
        tracing::info!("film {} ({}) has been added", id, record.name);

        Ok(Film::from_record(id, record, mpa, HashSet::new()))
    }

    async fn update_film(&self, request: FilmRequest) -> AppResult<Film> {
        let id = require_id(request.id, "film")?;

        let mut state = self.state.write().await;
        state.ensure_film(id)?;
        let record = self.validator.validate_film(&request)?;
        let mpa = resolve_mpa(record.mpa_id)?;
        state.films.insert(id, record.clone());
        tracing::debug!("film {} has been updated", id);

        Ok(Film::from_record(id, record, mpa, state.likes_of(id)))
    }

    async fn find_film(&self, id: FilmId) -> AppResult<Option<Film>> {
        self.state.read().await.film(id)
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.ensure_film(film_id)?;
        state.ensure_user(user_id)?;
        if !state.likes.insert(Like { film_id, user_id }) {
            tracing::debug!("user {} already likes film {}", user_id, film_id);
        }
        Ok(())
    }

    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> AppResult<()> {
        let removed = self
            .state
            .write()
            .await
            .likes
            .remove(&Like { film_id, user_id });

        if removed {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "User {} has not liked film {}",
                user_id, film_id
            )))
        }
    }
}

#[async_trait]
impl MpaStorage for InMemoryStorage {
    async fn all_mpa(&self) -> AppResult<Vec<Mpa>> {
        Ok(Mpa::catalogue())
    }

    async fn find_mpa(&self, id: MpaId) -> AppResult<Option<Mpa>> {
        Ok(Mpa::lookup(id))
    }
}
