use axum::{extract::State, response::Json};
use serde::Deserialize;

use crate::{
    api::extract::{AppJson, AppPath, AppQuery},
    app_state::AppState,
    error::AppResult,
    models::{Film, FilmId, FilmRequest, UserId},
};

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub count: Option<i64>,
}

pub async fn list_films_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.films.all_films().await?))
}

pub async fn create_film_handler(
    State(state): State<AppState>,
    AppJson(req): AppJson<FilmRequest>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.films.add_film(req).await?))
}

pub async fn update_film_handler(
    State(state): State<AppState>,
    AppJson(req): AppJson<FilmRequest>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.films.update_film(req).await?))
}

pub async fn get_film_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<FilmId>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.films.get_film(id).await?))
}

pub async fn add_like_handler(
    State(state): State<AppState>,
    AppPath((id, user_id)): AppPath<(FilmId, UserId)>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.film_service.add_like(id, user_id).await?))
}

pub async fn delete_like_handler(
    State(state): State<AppState>,
    AppPath((id, user_id)): AppPath<(FilmId, UserId)>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.film_service.delete_like(id, user_id).await?))
}

pub async fn popular_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PopularQuery>,
) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.film_service.most_popular(params.count).await?))
}
