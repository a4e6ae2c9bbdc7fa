#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use swimlog::config::Config;
use swimlog::db::{create_memory_pool, DbPool};
use swimlog::migrations::run_migrations_for_tests;
use swimlog::models::{CreateSet, NewUser, SwimSet, TrainingSession, User, UserRole};
use swimlog::repositories::{SessionRepository, UserRepository};
use swimlog::token::TokenKeys;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "password123";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration_hours: 1,
        app_env: "test".to_string(),
        app_version: "0.0.0-test".to_string(),
        signup_invite_code: None,
    }
}

pub fn create_test_app(pool: DbPool) -> Router {
    swimlog::build_app(pool, &test_config())
}

pub fn create_test_app_with_config(pool: DbPool, config: &Config) -> Router {
    swimlog::build_app(pool, config)
}

pub async fn create_test_user(pool: &DbPool, email: &str, role: UserRole) -> User {
    UserRepository::new(pool.clone())
        .create(NewUser {
            email: email.to_string(),
            username: None,
            password: TEST_PASSWORD.to_string(),
            role,
        })
        .await
        .unwrap()
}

pub fn token_for(user: &User) -> String {
    TokenKeys::new(TEST_SECRET, 1).issue(user).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub async fn create_session(pool: &DbPool, owner: Option<i64>, on: &str) -> TrainingSession {
    SessionRepository::new(pool.clone())
        .create_session(date(on), Some("test session".to_string()), owner)
        .await
        .unwrap()
}

/// 100m free x4 and 50m fly x6: 700m in 547s.
pub async fn add_sample_sets(pool: &DbPool, session_id: i64) -> Vec<SwimSet> {
    let repo = SessionRepository::new(pool.clone());
    let payloads = [
        CreateSet {
            distance_m: 100,
            reps: 4,
            interval_sec: 90,
            stroke: "free".to_string(),
            rpe: vec![5, 6, 6, 5],
            rep_times_sec: vec![75, 76, 77, 75],
        },
        CreateSet {
            distance_m: 50,
            reps: 6,
            interval_sec: 60,
            stroke: "fly".to_string(),
            rpe: vec![7, 7, 8, 7, 7, 7],
            rep_times_sec: vec![40, 41, 42, 40, 41, 40],
        },
    ];

    let mut sets = Vec::new();
    for payload in payloads {
        let set = payload.validate().unwrap();
        sets.push(repo.add_set(session_id, set).await.unwrap());
    }
    sets
}

pub fn set_payload() -> Value {
    serde_json::json!({
        "distance_m": 100,
        "reps": 4,
        "interval_sec": 90,
        "stroke": "Free",
        "rpe": [5, 6, 6, 5],
        "rep_times_sec": [75, 76, 77, 75]
    })
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Send a request and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, token, body).await;
    let status = response.status();
    let text = body_text(response).await;
    let json = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, "GET", uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, token, Some(body)).await
}
