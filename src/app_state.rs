use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    database::FilmorateDatabase,
    error::AppResult,
    services::{FilmService, FriendshipService},
    storage::{
        FilmDbStorage, FilmStorage, InMemoryStorage, MpaDbStorage, MpaStorage, UserDbStorage,
        UserStorage,
    },
    validation::{EntityValidator, StandardValidator},
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStorage>,
    pub films: Arc<dyn FilmStorage>,
    pub mpa: Arc<dyn MpaStorage>,
    pub friendships: FriendshipService,
    pub film_service: FilmService,
    /// Present only for the SQLite backend.
    pub database: Option<Arc<FilmorateDatabase>>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let validator: Arc<dyn EntityValidator> = Arc::new(StandardValidator::new());

        match config.storage {
            StorageBackend::Sqlite => {
                let database =
                    FilmorateDatabase::new(&config.database.url, config.database.max_connections)
                        .await?;
                database.init().await?;
                tracing::info!("using sqlite storage at {}", config.database.url);
                Ok(Self::with_database(Arc::new(database), validator, config))
            }
            StorageBackend::Memory => {
                tracing::info!("using in-memory storage");
                let storage = Arc::new(InMemoryStorage::new(validator));
                Ok(Self::from_storages(
                    storage.clone(),
                    storage.clone(),
                    storage,
                    None,
                    config,
                ))
            }
        }
    }

    pub fn with_database(
        database: Arc<FilmorateDatabase>,
        validator: Arc<dyn EntityValidator>,
        config: Config,
    ) -> Self {
        let users = Arc::new(UserDbStorage::new(database.clone(), validator.clone()));
        let films = Arc::new(FilmDbStorage::new(database.clone(), validator));
        let mpa = Arc::new(MpaDbStorage::new(database.clone()));
        Self::from_storages(users, films, mpa, Some(database), config)
    }

    pub fn from_storages(
        users: Arc<dyn UserStorage>,
        films: Arc<dyn FilmStorage>,
        mpa: Arc<dyn MpaStorage>,
        database: Option<Arc<FilmorateDatabase>>,
        config: Config,
    ) -> Self {
        Self {
            friendships: FriendshipService::new(users.clone()),
            film_service: FilmService::new(films.clone(), users.clone()),
            users,
            films,
            mpa,
            database,
            config,
        }
    }
}
