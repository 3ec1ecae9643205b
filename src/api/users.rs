use axum::{extract::State, response::Json};

use crate::{
    api::extract::{AppJson, AppPath},
    app_state::AppState,
    error::AppResult,
    models::{User, UserId, UserRequest},
};

pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.all_users().await?))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    AppJson(req): AppJson<UserRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.add_user(req).await?))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    AppJson(req): AppJson<UserRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.update_user(req).await?))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.get_user(id).await?))
}

pub async fn add_friend_handler(
    State(state): State<AppState>,
    AppPath((id, friend_id)): AppPath<(UserId, UserId)>,
) -> AppResult<Json<User>> {
    Ok(Json(state.friendships.add_friend(id, friend_id).await?))
}

pub async fn delete_friend_handler(
    State(state): State<AppState>,
    AppPath((id, friend_id)): AppPath<(UserId, UserId)>,
) -> AppResult<Json<User>> {
    Ok(Json(state.friendships.delete_friend(id, friend_id).await?))
}

pub async fn friends_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.friendships.friends(id).await?))
}

pub async fn common_friends_handler(
    State(state): State<AppState>,
    AppPath((id, other_id)): AppPath<(UserId, UserId)>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.friendships.common_friends(id, other_id).await?))
}
