// HTTP layer - thin axum handlers over the storages and services

pub mod extract;
pub mod films;
pub mod mpa;
pub mod users;

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};

use crate::{app_state::AppState, error::AppResult};

pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    match &state.database {
        Some(database) => {
            database.health_check().await?;
            Ok(Json(json!({"status": "ok", "storage": "sqlite"})))
        }
        None => Ok(Json(json!({"status": "ok", "storage": "memory"}))),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Users and friendships
        .route(
            "/users",
            get(users::list_users_handler)
                .post(users::create_user_handler)
                .put(users::update_user_handler),
        )
        .route("/users/{id}", get(users::get_user_handler))
        .route("/users/{id}/friends", get(users::friends_handler))
        .route(
            "/users/{id}/friends/{friend_id}",
            put(users::add_friend_handler).delete(users::delete_friend_handler),
        )
        .route(
            "/users/{id}/friends/common/{other_id}",
            get(users::common_friends_handler),
        )
        // Films and likes
        .route(
            "/films",
            get(films::list_films_handler)
                .post(films::create_film_handler)
                .put(films::update_film_handler),
        )
        .route("/films/popular", get(films::popular_handler))
        .route("/films/{id}", get(films::get_film_handler))
        .route(
            "/films/{id}/like/{user_id}",
            put(films::add_like_handler).delete(films::delete_like_handler),
        )
        // Reference data
        .route("/mpa", get(mpa::list_mpa_handler))
        .route("/mpa/{id}", get(mpa::get_mpa_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
