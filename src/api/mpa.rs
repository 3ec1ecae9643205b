use axum::{extract::State, response::Json};

use crate::{
    api::extract::AppPath,
    app_state::AppState,
    error::AppResult,
    models::{Mpa, MpaId},
};

pub async fn list_mpa_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Mpa>>> {
    Ok(Json(state.mpa.all_mpa().await?))
}

pub async fn get_mpa_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<MpaId>,
) -> AppResult<Json<Mpa>> {
    Ok(Json(state.mpa.get_mpa(id).await?))
}
