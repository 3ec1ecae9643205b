use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use filmorate::{
    api::create_router,
    app_state::AppState,
    config::{Config, StorageBackend},
    database::FilmorateDatabase,
    validation::StandardValidator,
};

async fn sqlite_app() -> Router {
    let database = Arc::new(FilmorateDatabase::new_in_memory().await.unwrap());
    let state = AppState::with_database(
        database,
        Arc::new(StandardValidator::new()),
        Config::in_memory(),
    );
    create_router(state)
}

async fn memory_app() -> Router {
    let mut config = Config::in_memory();
    config.storage = StorageBackend::Memory;
    create_router(AppState::new(config).await.unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "name": "",
        "email": format!("{}@mail.ru", login),
        "birthday": "1946-08-20"
    })
}

fn film_json(name: &str) -> Value {
    json!({
        "name": name,
        "description": "adipisicing",
        "releaseDate": "1967-03-25",
        "duration": 100,
        "mpa": { "id": 1 }
    })
}

async fn create_user(app: &Router, login: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/users", Some(user_json(login))).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().unwrap()
}

async fn create_film(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/films", Some(film_json(name))).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_user_create_fetch_update() {
    let app = sqlite_app().await;

    let (status, created) = send(&app, Method::POST, "/users", Some(user_json("dolore"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "dolore");
    assert_eq!(created["friends"], json!([]));

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let mut update = user_json("doloreUpdate");
    update["id"] = json!(id);
    update["name"] = json!("est adipisicing");
    let (status, updated) = send(&app, Method::PUT, "/users", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["login"], "doloreUpdate");

    let (status, all) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_errors_map_to_status_codes() {
    let app = sqlite_app().await;

    let mut bad = user_json("dolore");
    bad["email"] = json!("mail.ru");
    let (status, body) = send(&app, Method::POST, "/users", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let mut future = user_json("dolore");
    future["birthday"] = json!("2446-08-20");
    let (status, _) = send(&app, Method::POST, "/users", Some(future)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/users/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut ghost = user_json("ghost");
    ghost["id"] = json!(9999);
    let (status, _) = send(&app, Method::PUT, "/users", Some(ghost)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_input_is_bad_request_json() {
    let app = sqlite_app().await;

    let mut bad_date = user_json("dolore");
    bad_date["birthday"] = json!("20.08.1946");
    let (status, body) = send(&app, Method::POST, "/users", Some(bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let mut bad_duration = film_json("nisi eiusmod");
    bad_duration["duration"] = json!("long");
    let (status, body) = send(&app, Method::POST, "/films", Some(bad_duration)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(&app, Method::GET, "/films/popular?count=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(&app, Method::GET, "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_self_friendship_of_missing_user_is_not_found() {
    let app = sqlite_app().await;
    let id = create_user(&app, "dolore").await;

    let (status, _) = send(&app, Method::PUT, "/users/999/friends/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/users/{}/friends/{}", id, id);
    let (status, body) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_friends_flow() {
    let app = sqlite_app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let carol = create_user(&app, "carol").await;

    let (status, body) = send(&app, Method::PUT, &format!("/users/{}/friends/{}", alice, carol), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["friends"], json!([carol]));
    send(&app, Method::PUT, &format!("/users/{}/friends/{}", bob, carol), None).await;

    // not reciprocal
    let (_, carol_friends) = send(&app, Method::GET, &format!("/users/{}/friends", carol), None).await;
    assert_eq!(carol_friends, json!([]));

    let (status, common) = send(
        &app,
        Method::GET,
        &format!("/users/{}/friends/common/{}", alice, bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common.as_array().unwrap().len(), 1);
    assert_eq!(common[0]["id"], carol);

    let (status, _) = send(&app, Method::PUT, &format!("/users/{}/friends/-1", alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{}/friends/{}", alice, carol), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["friends"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{}/friends/{}", alice, carol), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_film_flow() {
    let app = sqlite_app().await;
    let user = create_user(&app, "critic").await;

    let (status, created) = send(&app, Method::POST, "/films", Some(film_json("nisi eiusmod"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["mpa"], json!({"id": 1, "name": "G"}));
    assert_eq!(created["releaseDate"], "1967-03-25");
    let film = created["id"].as_i64().unwrap();

    let mut too_early = film_json("lumiere");
    too_early["releaseDate"] = json!("1890-03-25");
    let (status, _) = send(&app, Method::POST, "/films", Some(too_early)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut update = film_json("Film Updated");
    update["id"] = json!(film);
    update["mpa"] = json!({"id": 5});
    let (status, updated) = send(&app, Method::PUT, "/films", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["mpa"]["name"], "NC-17");

    let (status, liked) = send(&app, Method::PUT, &format!("/films/{}/like/{}", film, user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"], json!([user]));

    let (status, _) = send(&app, Method::DELETE, &format!("/films/{}/like/{}", film, user), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &format!("/films/{}/like/{}", film, user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/films/424242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_popular_films() {
    let app = sqlite_app().await;
    let fans = [create_user(&app, "a").await, create_user(&app, "b").await];
    let quiet = create_film(&app, "quiet").await;
    let loud = create_film(&app, "loud").await;
    for fan in fans {
        send(&app, Method::PUT, &format!("/films/{}/like/{}", loud, fan), None).await;
    }

    let (status, popular) = send(&app, Method::GET, "/films/popular", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(popular[0]["id"], loud);
    assert_eq!(popular[1]["id"], quiet);

    let (_, one) = send(&app, Method::GET, "/films/popular?count=1", None).await;
    assert_eq!(one.as_array().unwrap().len(), 1);

    let (_, none) = send(&app, Method::GET, "/films/popular?count=0", None).await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_mpa_and_health() {
    let app = sqlite_app().await;

    let (status, all) = send(&app, Method::GET, "/mpa", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, pg13) = send(&app, Method::GET, "/mpa/3", None).await;
    assert_eq!(pg13, json!({"id": 3, "name": "PG-13"}));

    let (status, _) = send(&app, Method::GET, "/mpa/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["storage"], "sqlite");
}

#[tokio::test]
async fn test_memory_backend_serves_same_api() {
    let app = memory_app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let film = create_film(&app, "solaris").await;

    let (status, _) = send(&app, Method::PUT, &format!("/users/{}/friends/{}", alice, bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, liked) = send(&app, Method::PUT, &format!("/films/{}/like/{}", film, bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"], json!([bob]));

    let (_, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health["storage"], "memory");
}
